use crate::exec::frame::Frame;
use crate::model::{Slot, VmError, VmResult};
use crate::opcodes;

use super::take_operands;

pub fn nop(_frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    Ok(())
}

/// Host-assignability test; a null reference is never an instance.
pub fn instanceof(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    let (index,) = take_operands!(frame, u16);
    let reference = frame.stack.pop_reference()?;
    let result = match reference {
        None => false,
        Some(value) => {
            let class_name = frame.pool()?.class_name(index)?.to_string();
            frame.env()?.instance_of(&value, &class_name)?
        }
    };
    frame.stack.push(Slot::Int(result as i32));
    Ok(())
}

/// Implementation-reserved bytes signal a programming error, never a
/// bytecode gap.
pub fn reserved(_frame: &mut Frame<'_>, opcode: u8) -> VmResult<()> {
    Err(VmError::ReservedOpcode { name: opcodes::name(opcode).unwrap_or("???") })
}
