use crate::exec::frame::Frame;
use crate::model::{Slot, VmError, VmResult};
use crate::opcodes;

fn not_wide(slot: Slot, opcode: u8) -> VmResult<Slot> {
    if slot.is_wide() {
        return Err(VmError::WideSlot(opcodes::name(opcode).unwrap_or("???")));
    }
    Ok(slot)
}

pub fn pop(frame: &mut Frame<'_>, opcode: u8) -> VmResult<()> {
    not_wide(frame.stack.pop()?, opcode)?;
    Ok(())
}

/// Discards one wide value or two narrow ones.
pub fn pop2(frame: &mut Frame<'_>, opcode: u8) -> VmResult<()> {
    if !frame.stack.pop()?.is_wide() {
        not_wide(frame.stack.pop()?, opcode)?;
    }
    Ok(())
}

/// Exchanges the top two slots; wide operands are rejected.
pub fn swap(frame: &mut Frame<'_>, opcode: u8) -> VmResult<()> {
    let first = not_wide(frame.stack.pop()?, opcode)?;
    let second = not_wide(frame.stack.pop()?, opcode)?;
    frame.stack.push(first);
    frame.stack.push(second);
    Ok(())
}

pub fn dup(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    frame.stack.dup()
}

pub fn dupx1(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    frame.stack.dup_x1()
}

pub fn dupx2(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    frame.stack.dup_x2()
}

pub fn dup2(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    frame.stack.dup2()
}

pub fn dup2x1(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    frame.stack.dup2_x1()
}

pub fn dup2x2(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
    frame.stack.dup2_x2()
}
