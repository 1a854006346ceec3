//! Instruction dispatch: one handler per opcode byte.

use lazy_static::lazy_static;

use crate::exec::frame::Frame;
use crate::model::{VmError, VmResult};

mod instructions;

pub type InstructionHandler = for<'a, 'c> fn(&'a mut Frame<'c>, u8) -> VmResult<()>;

fn unknown_opcode(_frame: &mut Frame<'_>, opcode: u8) -> VmResult<()> {
    Err(VmError::UnknownOpcode { opcode })
}

lazy_static! {
    /// Every opcode byte maps to a handler; bytes the interpreter does not
    /// implement fail closed through [`unknown_opcode`].
    pub static ref HANDLERS: Vec<InstructionHandler> = {
        let mut handlers: Vec<InstructionHandler> = vec![unknown_opcode; 256];
        instructions::initialize(&mut handlers);
        handlers
    };
}
