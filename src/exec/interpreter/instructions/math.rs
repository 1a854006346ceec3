//! Arithmetic, shifts, conversions and numeric comparisons.
//!
//! Two-operand instructions compute `first_popped <op> second_popped`. The
//! shift instructions are the exception: the shift amount is always pushed
//! last, so it is popped first and the value second.

use std::num::Wrapping;

use crate::exec::frame::Frame;
use crate::model::{Slot, VmError, VmResult};

use super::take_operands;

macro_rules! define_imath {
    ( $insn:ident, $op:tt ) => {
        pub fn $insn(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
            let first = Wrapping(frame.stack.pop_int()?);
            let second = Wrapping(frame.stack.pop_int()?);
            frame.stack.push(Slot::Int((first $op second).0));
            Ok(())
        }
    };
}

macro_rules! define_lmath {
    ( $insn:ident, $op:tt ) => {
        pub fn $insn(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
            let first = Wrapping(frame.stack.pop_long()?);
            let second = Wrapping(frame.stack.pop_long()?);
            frame.stack.push(Slot::Long((first $op second).0));
            Ok(())
        }
    };
}

macro_rules! define_fmath {
    ( $insn:ident, $op:tt ) => {
        pub fn $insn(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
            let first = frame.stack.pop_float()?;
            let second = frame.stack.pop_float()?;
            frame.stack.push(Slot::Float(first $op second));
            Ok(())
        }
    };
}

macro_rules! define_dmath {
    ( $insn:ident, $op:tt ) => {
        pub fn $insn(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
            let first = frame.stack.pop_double()?;
            let second = frame.stack.pop_double()?;
            frame.stack.push(Slot::Double(first $op second));
            Ok(())
        }
    };
}

macro_rules! define_idivide {
    ( $insn:ident, $op:tt ) => {
        pub fn $insn(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
            let first = frame.stack.pop_int()?;
            let second = frame.stack.pop_int()?;
            if second == 0 {
                return Err(VmError::DivisionByZero);
            }
            frame.stack.push(Slot::Int((Wrapping(first) $op Wrapping(second)).0));
            Ok(())
        }
    };
}

macro_rules! define_ldivide {
    ( $insn:ident, $op:tt ) => {
        pub fn $insn(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
            let first = frame.stack.pop_long()?;
            let second = frame.stack.pop_long()?;
            if second == 0 {
                return Err(VmError::DivisionByZero);
            }
            frame.stack.push(Slot::Long((Wrapping(first) $op Wrapping(second)).0));
            Ok(())
        }
    };
}

macro_rules! define_ishift {
    ( $insn:ident, $method:ident, $cast:ty ) => {
        pub fn $insn(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
            let shift = frame.stack.pop_int()?;
            let value = frame.stack.pop_int()?;
            frame.stack.push(Slot::Int((value as $cast).$method(shift as u32) as i32));
            Ok(())
        }
    };
}

macro_rules! define_lshift {
    ( $insn:ident, $method:ident, $cast:ty ) => {
        pub fn $insn(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
            let shift = frame.stack.pop_int()?;
            let value = frame.stack.pop_long()?;
            frame.stack.push(Slot::Long((value as $cast).$method(shift as u32) as i64));
            Ok(())
        }
    };
}

macro_rules! define_cast {
    ( $insn:ident, $from:ident, $variant:ident, $cast:ty ) => {
        pub fn $insn(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
            paste::paste! {
                let value = frame.stack.[<pop_ $from>]()?;
            }
            frame.stack.push(Slot::$variant((value as $cast) as _));
            Ok(())
        }
    };
}

define_imath!(iadd, +);
define_imath!(isub, -);
define_imath!(imul, *);
define_imath!(iand, &);
define_imath!(ior, |);
define_imath!(ixor, ^);
define_idivide!(idiv, /);
define_idivide!(irem, %);

define_lmath!(ladd, +);
define_lmath!(lsub, -);
define_lmath!(lmul, *);
define_lmath!(land, &);
define_lmath!(lor, |);
define_lmath!(lxor, ^);
define_ldivide!(ldiv, /);
define_ldivide!(lrem, %);

define_fmath!(fadd, +);
define_fmath!(fsub, -);
define_fmath!(fmul, *);
define_fmath!(fdiv, /);
define_fmath!(frem, %);

define_dmath!(dadd, +);
define_dmath!(dsub, -);
define_dmath!(dmul, *);
define_dmath!(ddiv, /);
define_dmath!(drem, %);

define_ishift!(ishl, wrapping_shl, i32);
define_ishift!(ishr, wrapping_shr, i32);
define_ishift!(iushr, wrapping_shr, u32);

define_lshift!(lshl, wrapping_shl, i64);
define_lshift!(lshr, wrapping_shr, i64);
define_lshift!(lushr, wrapping_shr, u64);

pub fn ineg(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let value = frame.stack.pop_int()?;
    frame.stack.push(Slot::Int(0i32.wrapping_sub(value)));
    Ok(())
}

pub fn lneg(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let value = frame.stack.pop_long()?;
    frame.stack.push(Slot::Long(0i64.wrapping_sub(value)));
    Ok(())
}

pub fn fneg(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let value = frame.stack.pop_float()?;
    frame.stack.push(Slot::Float(0.0 - value));
    Ok(())
}

pub fn dneg(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let value = frame.stack.pop_double()?;
    frame.stack.push(Slot::Double(0.0 - value));
    Ok(())
}

define_cast!(i2l, int, Long, i64);
define_cast!(i2f, int, Float, f32);
define_cast!(i2d, int, Double, f64);
define_cast!(i2b, int, Int, i8);
define_cast!(i2c, int, Int, u16);
define_cast!(i2s, int, Int, i16);

define_cast!(l2i, long, Int, i32);
define_cast!(l2f, long, Float, f32);
define_cast!(l2d, long, Double, f64);

define_cast!(f2i, float, Int, i32);
define_cast!(f2l, float, Long, i64);
define_cast!(f2d, float, Double, f64);

define_cast!(d2i, double, Int, i32);
define_cast!(d2l, double, Long, i64);
define_cast!(d2f, double, Float, f32);

pub fn iinc(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let (index, delta) = take_operands!(frame, u8, i8);
    let value = frame.local(index as usize)?.int_value()?;
    frame.set_local(index as usize, Slot::Int(value.wrapping_add(delta as i32)))
}

pub fn lcmp(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let first = frame.stack.pop_long()?;
    let second = frame.stack.pop_long()?;
    let result = if first == second {
        0
    } else if first > second {
        1
    } else {
        -1
    };
    frame.stack.push(Slot::Int(result));
    Ok(())
}

/// L-variants resolve unordered operands toward -1.
macro_rules! define_cmpl {
    ( $insn:ident, $pop:ident ) => {
        pub fn $insn(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
            let first = frame.stack.$pop()?;
            let second = frame.stack.$pop()?;
            let result = if first == second {
                0
            } else if first > second {
                1
            } else {
                -1
            };
            frame.stack.push(Slot::Int(result));
            Ok(())
        }
    };
}

/// G-variants resolve unordered operands toward +1.
macro_rules! define_cmpg {
    ( $insn:ident, $pop:ident ) => {
        pub fn $insn(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
            let first = frame.stack.$pop()?;
            let second = frame.stack.$pop()?;
            let result = if first == second {
                0
            } else if second > first {
                -1
            } else {
                1
            };
            frame.stack.push(Slot::Int(result));
            Ok(())
        }
    };
}

define_cmpl!(fcmpl, pop_float);
define_cmpl!(dcmpl, pop_double);
define_cmpg!(fcmpg, pop_float);
define_cmpg!(dcmpg, pop_double);
