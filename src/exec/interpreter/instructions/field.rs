//! Field access through the reflection bridge.

use crate::exec::frame::Frame;
use crate::model::VmResult;

use super::take_operands;

pub fn getstatic(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let (index,) = take_operands!(frame, u16);
    frame.get_field(None, index)
}

pub fn putstatic(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let (index,) = take_operands!(frame, u16);
    let value = frame.stack.pop()?;
    frame.put_field(value, None, index)
}

pub fn getfield(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let (index,) = take_operands!(frame, u16);
    let target = frame.stack.pop_reference()?;
    frame.get_field(target, index)
}

/// Pops the value first, then the target object beneath it.
pub fn putfield(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let (index,) = take_operands!(frame, u16);
    let value = frame.stack.pop()?;
    let target = frame.stack.pop_reference()?;
    frame.put_field(value, target, index)
}
