//! Array allocation and the typed load/store family.
//!
//! Loads and stores dispatch on the array's host runtime type crossed with
//! the instruction's own type suffix; a mismatch (including a null array)
//! is fatal.

use crate::exec::frame::Frame;
use crate::model::{HostRef, HostValue, Slot, VmError, VmResult};
use crate::opcodes;

use super::take_operands;

fn mnemonic(opcode: u8) -> &'static str {
    opcodes::name(opcode).unwrap_or("???")
}

fn element<T>(values: &[T], index: i32) -> VmResult<&T> {
    usize::try_from(index)
        .ok()
        .and_then(|i| values.get(i))
        .ok_or(VmError::ArrayIndexOutOfBounds(index))
}

fn element_mut<T>(values: &mut [T], index: i32) -> VmResult<&mut T> {
    usize::try_from(index)
        .ok()
        .and_then(|i| values.get_mut(i))
        .ok_or(VmError::ArrayIndexOutOfBounds(index))
}

fn pop_array(frame: &mut Frame<'_>, opcode: u8) -> VmResult<HostRef> {
    frame
        .stack
        .pop_reference()?
        .ok_or(VmError::ArrayTypeMismatch(mnemonic(opcode)))
}

/// Allocates a native array sized by the popped length, typed by the
/// element tag operand.
pub fn newarray(frame: &mut Frame<'_>, opcode: u8) -> VmResult<()> {
    let length = frame.stack.pop_int()?;
    let (tag,) = take_operands!(frame, u8);
    if length < 0 {
        return Err(VmError::NegativeArraySize(length));
    }
    let length = length as usize;
    let array = match tag {
        b'Z' => HostValue::BooleanArray(vec![false; length]),
        b'B' => HostValue::ByteArray(vec![0; length]),
        b'C' => HostValue::CharArray(vec![0; length]),
        b'S' => HostValue::ShortArray(vec![0; length]),
        b'I' => HostValue::IntArray(vec![0; length]),
        b'J' => HostValue::LongArray(vec![0; length]),
        b'F' => HostValue::FloatArray(vec![0.0; length]),
        b'D' => HostValue::DoubleArray(vec![0.0; length]),
        _ => return Err(VmError::ArrayTypeMismatch(mnemonic(opcode))),
    };
    frame.stack.push(Slot::Reference(Some(array.into_ref())));
    Ok(())
}

pub fn arraylength(frame: &mut Frame<'_>, opcode: u8) -> VmResult<()> {
    let array = pop_array(frame, opcode)?;
    let length = match &*array.borrow() {
        HostValue::BooleanArray(values) => values.len(),
        HostValue::ByteArray(values) => values.len(),
        HostValue::CharArray(values) => values.len(),
        HostValue::ShortArray(values) => values.len(),
        HostValue::IntArray(values) => values.len(),
        HostValue::LongArray(values) => values.len(),
        HostValue::FloatArray(values) => values.len(),
        HostValue::DoubleArray(values) => values.len(),
        _ => return Err(VmError::ArrayTypeMismatch(mnemonic(opcode))),
    };
    frame.stack.push(Slot::Int(length as i32));
    Ok(())
}

/// Shared by the eight `*aload` opcodes.
pub fn arrayload(frame: &mut Frame<'_>, opcode: u8) -> VmResult<()> {
    let index = frame.stack.pop_int()?;
    let array = pop_array(frame, opcode)?;
    let slot = match (&*array.borrow(), opcode) {
        (HostValue::BooleanArray(values), opcodes::BALOAD) => {
            Slot::Int(*element(values, index)? as i32)
        }
        (HostValue::ByteArray(values), opcodes::BALOAD) => {
            Slot::Int(*element(values, index)? as i32)
        }
        (HostValue::CharArray(values), opcodes::CALOAD) => {
            Slot::Int(*element(values, index)? as i32)
        }
        (HostValue::ShortArray(values), opcodes::SALOAD) => {
            Slot::Int(*element(values, index)? as i32)
        }
        (HostValue::IntArray(values), opcodes::IALOAD) => Slot::Int(*element(values, index)?),
        (HostValue::LongArray(values), opcodes::LALOAD) => Slot::Long(*element(values, index)?),
        (HostValue::FloatArray(values), opcodes::FALOAD) => Slot::Float(*element(values, index)?),
        (HostValue::DoubleArray(values), opcodes::DALOAD) => {
            Slot::Double(*element(values, index)?)
        }
        _ => return Err(VmError::ArrayTypeMismatch(mnemonic(opcode))),
    };
    frame.stack.push(slot);
    Ok(())
}

/// Shared by the eight `*astore` opcodes.
pub fn arraystore(frame: &mut Frame<'_>, opcode: u8) -> VmResult<()> {
    let value = frame.stack.pop()?;
    let index = frame.stack.pop_int()?;
    let array = pop_array(frame, opcode)?;
    match (&mut *array.borrow_mut(), opcode) {
        (HostValue::BooleanArray(values), opcodes::BASTORE) => {
            *element_mut(values, index)? = value.int_value()? != 0;
        }
        (HostValue::ByteArray(values), opcodes::BASTORE) => {
            *element_mut(values, index)? = value.int_value()? as i8;
        }
        (HostValue::CharArray(values), opcodes::CASTORE) => {
            *element_mut(values, index)? = value.int_value()? as u16;
        }
        (HostValue::ShortArray(values), opcodes::SASTORE) => {
            *element_mut(values, index)? = value.int_value()? as i16;
        }
        (HostValue::IntArray(values), opcodes::IASTORE) => {
            *element_mut(values, index)? = value.int_value()?;
        }
        (HostValue::LongArray(values), opcodes::LASTORE) => {
            *element_mut(values, index)? = value.long_value()?;
        }
        (HostValue::FloatArray(values), opcodes::FASTORE) => {
            *element_mut(values, index)? = value.float_value()?;
        }
        (HostValue::DoubleArray(values), opcodes::DASTORE) => {
            *element_mut(values, index)? = value.double_value()?;
        }
        _ => return Err(VmError::ArrayTypeMismatch(mnemonic(opcode))),
    }
    Ok(())
}
