use crate::exec::frame::Frame;
use crate::model::{Slot, VmResult};

use super::take_operands;

macro_rules! define_varload {
    ( $insn:ident, $ty:ident, $variant:ident ) => {
        pub fn $insn(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
            paste::paste! {
                let (index,) = take_operands!(frame, u8);
                let value = frame.local(index as usize)?.[<$ty _value>]()?;
                frame.stack.push(Slot::$variant(value));
                Ok(())
            }
        }
    };
}

macro_rules! define_load {
    ( $insn:ident, $index:literal, $ty:ident, $variant:ident ) => {
        pub fn $insn(frame: &mut Frame<'_>, _opcode: u8) -> VmResult<()> {
            paste::paste! {
                let value = frame.local($index)?.[<$ty _value>]()?;
                frame.stack.push(Slot::$variant(value));
                Ok(())
            }
        }
    };
}

define_varload!(iload, int, Int);
define_load!(iload0, 0, int, Int);
define_load!(iload1, 1, int, Int);
define_load!(iload2, 2, int, Int);
define_load!(iload3, 3, int, Int);

define_varload!(lload, long, Long);
define_load!(lload0, 0, long, Long);
define_load!(lload1, 1, long, Long);
define_load!(lload2, 2, long, Long);
define_load!(lload3, 3, long, Long);

define_varload!(fload, float, Float);
define_load!(fload0, 0, float, Float);
define_load!(fload1, 1, float, Float);
define_load!(fload2, 2, float, Float);
define_load!(fload3, 3, float, Float);

define_varload!(dload, double, Double);
define_load!(dload0, 0, double, Double);
define_load!(dload1, 1, double, Double);
define_load!(dload2, 2, double, Double);
define_load!(dload3, 3, double, Double);

define_varload!(aload, reference, Reference);
define_load!(aload0, 0, reference, Reference);
define_load!(aload1, 1, reference, Reference);
define_load!(aload2, 2, reference, Reference);
define_load!(aload3, 3, reference, Reference);
