//! The interpreter frame: one method's bytecode, locals and operand stack.

use classfile::constant_pool::Item;
use classfile::{descriptor, ConstantPool, JavaClass, ParseError};
use log::trace;

use crate::exec::env::HostEnv;
use crate::exec::interpreter;
use crate::model::{HostValue, OperandStack, Slot, VmError, VmResult};
use crate::opcodes;

/// A single method invocation being interpreted.
///
/// A frame starts fresh (pc 0, empty stack unless the caller pre-pushes
/// arguments), is mutated one instruction at a time by [`Frame::step`], and
/// becomes terminal once a return instruction has executed. Exactly one
/// frame is ever active per run: `invoke*` escapes to the host runtime
/// instead of pushing a second interpreted frame.
pub struct Frame<'a> {
    code: &'a [u8],
    pub(crate) locals: Vec<Slot>,
    pub(crate) stack: OperandStack,
    pc: usize,
    /// Address of the opcode currently executing; branch offsets are
    /// relative to this, not to the operand bytes.
    pub(crate) insn_addr: usize,
    pool: Option<&'a ConstantPool>,
    env: Option<&'a HostEnv>,
    return_value: Option<Slot>,
    done: bool,
}

impl<'a> Frame<'a> {
    /// Creates a fresh frame over `code` with `locals` local variable
    /// slots. A class supplies the constant pool for symbolic instructions;
    /// frames for free-standing bytecode may pass `None`.
    pub fn new(class: Option<&'a JavaClass>, locals: usize, code: &'a [u8]) -> Frame<'a> {
        Frame {
            code,
            locals: vec![Slot::Empty; locals],
            stack: OperandStack::new(),
            pc: 0,
            insn_addr: 0,
            pool: class.map(|c| &c.pool),
            env: None,
            return_value: None,
            done: false,
        }
    }

    /// Attaches the host environment used by the reflection bridge.
    pub fn with_env(mut self, env: &'a HostEnv) -> Frame<'a> {
        self.env = Some(env);
        self
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn locals(&self) -> &[Slot] {
        &self.locals
    }

    pub fn stack(&self) -> &OperandStack {
        &self.stack
    }

    /// Mutable stack access, used by callers to pre-push `this`/arguments
    /// before the first step.
    pub fn stack_mut(&mut self) -> &mut OperandStack {
        &mut self.stack
    }

    /// The value produced by a return instruction; `None` until the frame
    /// returns, and for `void` returns.
    pub fn return_value(&self) -> Option<&Slot> {
        self.return_value.as_ref()
    }

    /// Executes exactly one instruction. Returns `false` once a return
    /// instruction has run; stepping a returned frame faults.
    pub fn step(&mut self) -> VmResult<bool> {
        if self.done {
            return Err(VmError::FrameReturned);
        }
        let addr = self.pc;
        let opcode = *self.code.get(addr).ok_or(VmError::PcOutOfRange(addr))?;
        self.insn_addr = addr;
        self.pc = addr + 1;
        trace!("{:5} {}", addr, opcodes::name(opcode).unwrap_or("???"));
        let handler = interpreter::HANDLERS[opcode as usize];
        handler(self, opcode)?;
        Ok(!self.done)
    }

    /// Drives the frame to completion and enforces the clean-exit
    /// invariant: a non-empty operand stack after the return is a fault.
    pub fn run(&mut self) -> VmResult<Option<Slot>> {
        self.return_value = None;
        while self.step()? {}
        if self.stack.size() != 0 {
            return Err(VmError::DirtyStackOnReturn);
        }
        Ok(self.return_value.clone())
    }

    pub(crate) fn finish(&mut self, value: Option<Slot>) {
        self.return_value = value;
        self.done = true;
    }

    pub(crate) fn read_u8(&mut self) -> VmResult<u8> {
        let byte = *self.code.get(self.pc).ok_or(VmError::PcOutOfRange(self.pc))?;
        self.pc += 1;
        Ok(byte)
    }

    pub(crate) fn read_i8(&mut self) -> VmResult<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub(crate) fn read_u16(&mut self) -> VmResult<u16> {
        let high = self.read_u8()? as u16;
        let low = self.read_u8()? as u16;
        Ok(high << 8 | low)
    }

    pub(crate) fn read_i16(&mut self) -> VmResult<i16> {
        Ok(self.read_u16()? as i16)
    }

    pub(crate) fn read_i32(&mut self) -> VmResult<i32> {
        let high = self.read_u16()? as u32;
        let low = self.read_u16()? as u32;
        Ok((high << 16 | low) as i32)
    }

    /// Jumps relative to the current instruction's own address.
    pub(crate) fn branch(&mut self, offset: i32) -> VmResult<()> {
        let target = self.insn_addr as i64 + offset as i64;
        if target < 0 {
            return Err(VmError::PcOutOfRange(self.insn_addr));
        }
        self.pc = target as usize;
        Ok(())
    }

    /// Absolute jump, used by `ret`.
    pub(crate) fn jump_to(&mut self, target: usize) {
        self.pc = target;
    }

    pub(crate) fn local(&self, index: usize) -> VmResult<&Slot> {
        self.locals.get(index).ok_or(VmError::LocalOutOfRange(index))
    }

    /// Writes a local, reserving the adjacent slot for wide values.
    pub(crate) fn set_local(&mut self, index: usize, slot: Slot) -> VmResult<()> {
        let last = if slot.is_wide() { index + 1 } else { index };
        if last >= self.locals.len() {
            return Err(VmError::LocalOutOfRange(last));
        }
        let wide = slot.is_wide();
        self.locals[index] = slot;
        if wide {
            self.locals[index + 1] = Slot::Empty;
        }
        Ok(())
    }

    pub(crate) fn pool(&self) -> VmResult<&'a ConstantPool> {
        self.pool.ok_or(VmError::NoConstantPool)
    }

    pub(crate) fn env(&self) -> VmResult<&'a HostEnv> {
        self.env.ok_or_else(|| VmError::unsupported("reach the host: no environment attached"))
    }

    /// Resolves an `ldc`-family constant and pushes it.
    pub(crate) fn push_constant(&mut self, index: u16) -> VmResult<()> {
        let pool = self.pool()?;
        let slot = match pool.item(index)? {
            Item::Integer(value) => Slot::Int(*value),
            Item::Long(value) => Slot::Long(*value),
            Item::Float(value) => Slot::Float(*value),
            Item::Double(value) => Slot::Double(*value),
            Item::String { string_index } => {
                let value = pool.string(*string_index)?.to_string();
                Slot::Reference(Some(HostValue::Str(value).into_ref()))
            }
            other => {
                return Err(VmError::unsupported(format!(
                    "load constant of unknown item type {}",
                    other.tag()
                )))
            }
        };
        self.stack.push(slot);
        Ok(())
    }

    /// Resolves a FieldRef constant into (class, field, descriptor) names.
    fn field_symbol(&self, index: u16) -> VmResult<(String, String, String)> {
        let pool = self.pool()?;
        let (class_index, nat_index) = match pool.item(index)? {
            Item::FieldRef { class_index, name_and_type_index } => {
                (*class_index, *name_and_type_index)
            }
            _ => return Err(ParseError::WrongItemType(index).into()),
        };
        self.symbol_names(class_index, nat_index)
    }

    /// Resolves a MethodRef constant into (class, method, descriptor) names.
    fn method_symbol(&self, index: u16) -> VmResult<(String, String, String)> {
        let pool = self.pool()?;
        let (class_index, nat_index) = match pool.item(index)? {
            Item::MethodRef { class_index, name_and_type_index } => {
                (*class_index, *name_and_type_index)
            }
            _ => return Err(ParseError::WrongItemType(index).into()),
        };
        self.symbol_names(class_index, nat_index)
    }

    fn symbol_names(&self, class_index: u16, nat_index: u16) -> VmResult<(String, String, String)> {
        let pool = self.pool()?;
        let (name_index, descriptor_index) = match pool.item(nat_index)? {
            Item::NameAndType { name_index, descriptor_index } => {
                (*name_index, *descriptor_index)
            }
            _ => return Err(ParseError::WrongItemType(nat_index).into()),
        };
        Ok((
            pool.class_name(class_index)?.to_string(),
            pool.string(name_index)?.to_string(),
            pool.string(descriptor_index)?.to_string(),
        ))
    }

    /// `getfield`/`getstatic`: reads the named field and pushes the slot.
    pub(crate) fn get_field(&mut self, target: Option<crate::model::HostRef>, index: u16) -> VmResult<()> {
        let (class_name, field_name, descriptor) = self.field_symbol(index)?;
        let slot = self.env()?.get_field(target.as_ref(), &class_name, &field_name, &descriptor)?;
        self.stack.push(slot);
        Ok(())
    }

    /// `putfield`/`putstatic`: writes the named field.
    pub(crate) fn put_field(
        &mut self,
        value: Slot,
        target: Option<crate::model::HostRef>,
        index: u16,
    ) -> VmResult<()> {
        let (class_name, field_name, descriptor) = self.field_symbol(index)?;
        self.env()?.put_field(target.as_ref(), &class_name, &field_name, &descriptor, value)
    }

    /// `invokestatic`/`invokevirtual`: resolves the method symbol, pops one
    /// logical slot per declared parameter (last pushed argument maps to
    /// the last formal parameter) and escapes to the host method body.
    pub(crate) fn invoke(&mut self, target: Option<crate::model::HostRef>, index: u16) -> VmResult<()> {
        let (class_name, method_name, descriptor) = self.method_symbol(index)?;
        let parameters = descriptor::parse_method_descriptor(&descriptor)
            .map_err(|e| {
                VmError::unsupported_by(
                    format!("execute method {}:{}", class_name, method_name),
                    e.into(),
                )
            })?
            .parameters;
        let mut arguments = vec![Slot::Empty; parameters.len()];
        for argument in arguments.iter_mut().rev() {
            *argument = self.stack.pop()?;
        }
        let result = self.env()?.invoke(
            target.as_ref(),
            &class_name,
            &method_name,
            &descriptor,
            &arguments,
        )?;
        if let Some(slot) = result {
            self.stack.push(slot);
        }
        Ok(())
    }
}
