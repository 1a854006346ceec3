use crate::exec::frame::Frame;
use crate::model::{Slot, VmResult};

use super::take_operands;

macro_rules! define_varstore {
    ( $insn:ident, $ty:ident, $variant:ident ) => {
        pub fn $insn(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
            paste::paste! {
                let (index,) = take_operands!(frame, u8);
                let value = frame.stack.[<pop_ $ty>]()?;
                frame.set_local(index as usize, Slot::$variant(value))
            }
        }
    };
}

macro_rules! define_store {
    ( $insn:ident, $index:literal, $ty:ident, $variant:ident ) => {
        pub fn $insn(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
            paste::paste! {
                let value = frame.stack.[<pop_ $ty>]()?;
                frame.set_local($index, Slot::$variant(value))
            }
        }
    };
}

define_varstore!(istore, int, Int);
define_store!(istore0, 0, int, Int);
define_store!(istore1, 1, int, Int);
define_store!(istore2, 2, int, Int);
define_store!(istore3, 3, int, Int);

define_varstore!(lstore, long, Long);
define_store!(lstore0, 0, long, Long);
define_store!(lstore1, 1, long, Long);
define_store!(lstore2, 2, long, Long);
define_store!(lstore3, 3, long, Long);

define_varstore!(fstore, float, Float);
define_store!(fstore0, 0, float, Float);
define_store!(fstore1, 1, float, Float);
define_store!(fstore2, 2, float, Float);
define_store!(fstore3, 3, float, Float);

define_varstore!(dstore, double, Double);
define_store!(dstore0, 0, double, Double);
define_store!(dstore1, 1, double, Double);
define_store!(dstore2, 2, double, Double);
define_store!(dstore3, 3, double, Double);

define_varstore!(astore, reference, Reference);
define_store!(astore0, 0, reference, Reference);
define_store!(astore1, 1, reference, Reference);
define_store!(astore2, 2, reference, Reference);
define_store!(astore3, 3, reference, Reference);
