//! Method invocation. Calls always escape to the host runtime's method
//! body; no second interpreted frame is ever pushed.

use crate::exec::frame::Frame;
use crate::model::VmResult;

use super::take_operands;

pub fn invokestatic(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let (index,) = take_operands!(frame, u16);
    frame.invoke(None, index)
}

/// The receiver sits on top of the stack and is popped before the
/// arguments.
pub fn invokevirtual(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let receiver = frame.stack.pop_reference()?;
    let (index,) = take_operands!(frame, u16);
    frame.invoke(receiver, index)
}
