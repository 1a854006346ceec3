use crate::exec::frame::Frame;
use crate::model::{Slot, VmResult};

use super::take_operands;

macro_rules! define_const {
    ( $insn:ident, $variant:ident, $value:expr ) => {
        pub fn $insn(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
            frame.stack.push(Slot::$variant($value));
            Ok(())
        }
    };
}

define_const!(aconstnull, Reference, None);

define_const!(iconstm1, Int, -1);
define_const!(iconst0, Int, 0);
define_const!(iconst1, Int, 1);
define_const!(iconst2, Int, 2);
define_const!(iconst3, Int, 3);
define_const!(iconst4, Int, 4);
define_const!(iconst5, Int, 5);

define_const!(lconst0, Long, 0);
define_const!(lconst1, Long, 1);

define_const!(fconst0, Float, 0f32);
define_const!(fconst1, Float, 1f32);
define_const!(fconst2, Float, 2f32);

define_const!(dconst0, Double, 0f64);
define_const!(dconst1, Double, 1f64);

pub fn bipush(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let (value,) = take_operands!(frame, i8);
    frame.stack.push(Slot::Int(value as i32));
    Ok(())
}

pub fn sipush(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let (value,) = take_operands!(frame, i16);
    frame.stack.push(Slot::Int(value as i32));
    Ok(())
}

pub fn ldc(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let (index,) = take_operands!(frame, u8);
    frame.push_constant(index as u16)
}

/// Shared by `ldc_w` and `ldc2_w`; both read a two-byte pool index.
pub fn ldcw(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let (index,) = take_operands!(frame, u16);
    frame.push_constant(index)
}
