//! Branches, subroutines and returns. Branch targets are relative to the
//! address of the branch opcode itself.

use crate::exec::frame::Frame;
use crate::model::{HostValue, Slot, VmError, VmResult};

use super::take_operands;

macro_rules! define_if {
    ( $insn:ident, $op:tt ) => {
        pub fn $insn(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
            let (offset,) = take_operands!(frame, i16);
            let value = frame.stack.pop_int()?;
            if value $op 0 {
                frame.branch(offset as i32)?;
            }
            Ok(())
        }
    };
}

macro_rules! define_ificmp {
    ( $insn:ident, $op:tt ) => {
        pub fn $insn(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
            let (offset,) = take_operands!(frame, i16);
            let first = frame.stack.pop_int()?;
            let second = frame.stack.pop_int()?;
            if first $op second {
                frame.branch(offset as i32)?;
            }
            Ok(())
        }
    };
}

define_if!(ifeq, ==);
define_if!(ifne, !=);
define_if!(iflt, <);
define_if!(ifge, >=);
define_if!(ifgt, >);
define_if!(ifle, <=);

define_ificmp!(ificmpeq, ==);
define_ificmp!(ificmpne, !=);
define_ificmp!(ificmplt, <);
define_ificmp!(ificmpge, >=);
define_ificmp!(ificmpgt, >);
define_ificmp!(ificmple, <=);

pub fn ifacmpeq(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let (offset,) = take_operands!(frame, i16);
    let first = frame.stack.pop_reference()?;
    let second = frame.stack.pop_reference()?;
    if references_equal(&first, &second) {
        frame.branch(offset as i32)?;
    }
    Ok(())
}

pub fn ifacmpne(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let (offset,) = take_operands!(frame, i16);
    let first = frame.stack.pop_reference()?;
    let second = frame.stack.pop_reference()?;
    if !references_equal(&first, &second) {
        frame.branch(offset as i32)?;
    }
    Ok(())
}

fn references_equal(
    first: &Option<crate::model::HostRef>,
    second: &Option<crate::model::HostRef>,
) -> bool {
    match (first, second) {
        (None, None) => true,
        (Some(a), Some(b)) => std::rc::Rc::ptr_eq(a, b),
        _ => false,
    }
}

pub fn ifnull(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let (offset,) = take_operands!(frame, i16);
    if frame.stack.pop_reference()?.is_none() {
        frame.branch(offset as i32)?;
    }
    Ok(())
}

pub fn ifnonnull(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let (offset,) = take_operands!(frame, i16);
    if frame.stack.pop_reference()?.is_some() {
        frame.branch(offset as i32)?;
    }
    Ok(())
}

pub fn goto(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let (offset,) = take_operands!(frame, i16);
    frame.branch(offset as i32)
}

pub fn gotow(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let (offset,) = take_operands!(frame, i32);
    frame.branch(offset)
}

/// Pushes the address of the next instruction as a return-address slot and
/// jumps to the target.
pub fn jsr(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let (offset,) = take_operands!(frame, i16);
    let return_address = HostValue::ReturnAddress(frame.pc()).into_ref();
    frame.stack.push(Slot::Reference(Some(return_address)));
    frame.branch(offset as i32)
}

pub fn jsrw(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let (offset,) = take_operands!(frame, i32);
    let return_address = HostValue::ReturnAddress(frame.pc()).into_ref();
    frame.stack.push(Slot::Reference(Some(return_address)));
    frame.branch(offset)
}

/// Jumps to the return address stored in a local variable.
pub fn ret(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let (index,) = take_operands!(frame, u8);
    let reference = frame.local(index as usize)?.reference_value()?;
    let reference = reference.ok_or(VmError::TypeMismatch {
        expected: "return address",
        found: "null reference",
    })?;
    let target = match &*reference.borrow() {
        HostValue::ReturnAddress(address) => *address,
        _ => {
            return Err(VmError::TypeMismatch {
                expected: "return address",
                found: "reference",
            })
        }
    };
    frame.jump_to(target);
    Ok(())
}

/// Typed returns validate the popped slot before fixing it as the frame's
/// return value.
macro_rules! define_return {
    ( $insn:ident, $check:ident ) => {
        pub fn $insn(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
            let value = frame.stack.pop()?;
            value.$check()?;
            frame.finish(Some(value));
            Ok(())
        }
    };
}

define_return!(ireturn, int_value);
define_return!(lreturn, long_value);
define_return!(freturn, float_value);
define_return!(dreturn, double_value);
define_return!(areturn, reference_value);

pub fn returnvoid(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    frame.finish(None);
    Ok(())
}
