//! Instruction handlers, grouped by category.

use crate::opcodes::*;

use super::InstructionHandler;

/// Reads a tuple of operands from the instruction stream, e.g.
/// `let (index, value) = take_operands!(frame, u8, i8);`
macro_rules! take_operands {
    ( $frame:expr, $( $width:ident ),+ ) => {{
        paste::paste! {
            ( $( $frame.[<read_ $width>]()?, )+ )
        }
    }};
}

pub(crate) use take_operands;

mod array;
mod constant;
mod control_flow;
mod field;
mod invoke;
mod load;
mod math;
mod misc;
mod stack;
mod store;

pub fn initialize(handlers: &mut [InstructionHandler]) {
    handlers[NOP as usize] = misc::nop;

    handlers[ACONST_NULL as usize] = constant::aconstnull;

    handlers[ICONST_M1 as usize] = constant::iconstm1;
    handlers[ICONST_0 as usize] = constant::iconst0;
    handlers[ICONST_1 as usize] = constant::iconst1;
    handlers[ICONST_2 as usize] = constant::iconst2;
    handlers[ICONST_3 as usize] = constant::iconst3;
    handlers[ICONST_4 as usize] = constant::iconst4;
    handlers[ICONST_5 as usize] = constant::iconst5;

    handlers[LCONST_0 as usize] = constant::lconst0;
    handlers[LCONST_1 as usize] = constant::lconst1;

    handlers[FCONST_0 as usize] = constant::fconst0;
    handlers[FCONST_1 as usize] = constant::fconst1;
    handlers[FCONST_2 as usize] = constant::fconst2;

    handlers[DCONST_0 as usize] = constant::dconst0;
    handlers[DCONST_1 as usize] = constant::dconst1;

    handlers[BIPUSH as usize] = constant::bipush;
    handlers[SIPUSH as usize] = constant::sipush;
    handlers[LDC as usize] = constant::ldc;
    handlers[LDC_W as usize] = constant::ldcw;
    handlers[LDC2_W as usize] = constant::ldcw;

    handlers[ILOAD as usize] = load::iload;
    handlers[LLOAD as usize] = load::lload;
    handlers[FLOAD as usize] = load::fload;
    handlers[DLOAD as usize] = load::dload;
    handlers[ALOAD as usize] = load::aload;

    handlers[ILOAD_0 as usize] = load::iload0;
    handlers[ILOAD_1 as usize] = load::iload1;
    handlers[ILOAD_2 as usize] = load::iload2;
    handlers[ILOAD_3 as usize] = load::iload3;

    handlers[LLOAD_0 as usize] = load::lload0;
    handlers[LLOAD_1 as usize] = load::lload1;
    handlers[LLOAD_2 as usize] = load::lload2;
    handlers[LLOAD_3 as usize] = load::lload3;

    handlers[FLOAD_0 as usize] = load::fload0;
    handlers[FLOAD_1 as usize] = load::fload1;
    handlers[FLOAD_2 as usize] = load::fload2;
    handlers[FLOAD_3 as usize] = load::fload3;

    handlers[DLOAD_0 as usize] = load::dload0;
    handlers[DLOAD_1 as usize] = load::dload1;
    handlers[DLOAD_2 as usize] = load::dload2;
    handlers[DLOAD_3 as usize] = load::dload3;

    handlers[ALOAD_0 as usize] = load::aload0;
    handlers[ALOAD_1 as usize] = load::aload1;
    handlers[ALOAD_2 as usize] = load::aload2;
    handlers[ALOAD_3 as usize] = load::aload3;

    handlers[IALOAD as usize] = array::arrayload;
    handlers[LALOAD as usize] = array::arrayload;
    handlers[FALOAD as usize] = array::arrayload;
    handlers[DALOAD as usize] = array::arrayload;
    handlers[AALOAD as usize] = array::arrayload;
    handlers[BALOAD as usize] = array::arrayload;
    handlers[CALOAD as usize] = array::arrayload;
    handlers[SALOAD as usize] = array::arrayload;

    handlers[ISTORE as usize] = store::istore;
    handlers[LSTORE as usize] = store::lstore;
    handlers[FSTORE as usize] = store::fstore;
    handlers[DSTORE as usize] = store::dstore;
    handlers[ASTORE as usize] = store::astore;

    handlers[ISTORE_0 as usize] = store::istore0;
    handlers[ISTORE_1 as usize] = store::istore1;
    handlers[ISTORE_2 as usize] = store::istore2;
    handlers[ISTORE_3 as usize] = store::istore3;

    handlers[LSTORE_0 as usize] = store::lstore0;
    handlers[LSTORE_1 as usize] = store::lstore1;
    handlers[LSTORE_2 as usize] = store::lstore2;
    handlers[LSTORE_3 as usize] = store::lstore3;

    handlers[FSTORE_0 as usize] = store::fstore0;
    handlers[FSTORE_1 as usize] = store::fstore1;
    handlers[FSTORE_2 as usize] = store::fstore2;
    handlers[FSTORE_3 as usize] = store::fstore3;

    handlers[DSTORE_0 as usize] = store::dstore0;
    handlers[DSTORE_1 as usize] = store::dstore1;
    handlers[DSTORE_2 as usize] = store::dstore2;
    handlers[DSTORE_3 as usize] = store::dstore3;

    handlers[ASTORE_0 as usize] = store::astore0;
    handlers[ASTORE_1 as usize] = store::astore1;
    handlers[ASTORE_2 as usize] = store::astore2;
    handlers[ASTORE_3 as usize] = store::astore3;

    handlers[IASTORE as usize] = array::arraystore;
    handlers[LASTORE as usize] = array::arraystore;
    handlers[FASTORE as usize] = array::arraystore;
    handlers[DASTORE as usize] = array::arraystore;
    handlers[AASTORE as usize] = array::arraystore;
    handlers[BASTORE as usize] = array::arraystore;
    handlers[CASTORE as usize] = array::arraystore;
    handlers[SASTORE as usize] = array::arraystore;

    handlers[POP as usize] = stack::pop;
    handlers[POP2 as usize] = stack::pop2;
    handlers[DUP as usize] = stack::dup;
    handlers[DUP_X1 as usize] = stack::dupx1;
    handlers[DUP_X2 as usize] = stack::dupx2;
    handlers[DUP2 as usize] = stack::dup2;
    handlers[DUP2_X1 as usize] = stack::dup2x1;
    handlers[DUP2_X2 as usize] = stack::dup2x2;
    handlers[SWAP as usize] = stack::swap;

    handlers[IADD as usize] = math::iadd;
    handlers[LADD as usize] = math::ladd;
    handlers[FADD as usize] = math::fadd;
    handlers[DADD as usize] = math::dadd;
    handlers[ISUB as usize] = math::isub;
    handlers[LSUB as usize] = math::lsub;
    handlers[FSUB as usize] = math::fsub;
    handlers[DSUB as usize] = math::dsub;
    handlers[IMUL as usize] = math::imul;
    handlers[LMUL as usize] = math::lmul;
    handlers[FMUL as usize] = math::fmul;
    handlers[DMUL as usize] = math::dmul;
    handlers[IDIV as usize] = math::idiv;
    handlers[LDIV as usize] = math::ldiv;
    handlers[FDIV as usize] = math::fdiv;
    handlers[DDIV as usize] = math::ddiv;
    handlers[IREM as usize] = math::irem;
    handlers[LREM as usize] = math::lrem;
    handlers[FREM as usize] = math::frem;
    handlers[DREM as usize] = math::drem;
    handlers[INEG as usize] = math::ineg;
    handlers[LNEG as usize] = math::lneg;
    handlers[FNEG as usize] = math::fneg;
    handlers[DNEG as usize] = math::dneg;

    handlers[ISHL as usize] = math::ishl;
    handlers[LSHL as usize] = math::lshl;
    handlers[ISHR as usize] = math::ishr;
    handlers[LSHR as usize] = math::lshr;
    handlers[IUSHR as usize] = math::iushr;
    handlers[LUSHR as usize] = math::lushr;
    handlers[IAND as usize] = math::iand;
    handlers[LAND as usize] = math::land;
    handlers[IOR as usize] = math::ior;
    handlers[LOR as usize] = math::lor;
    handlers[IXOR as usize] = math::ixor;
    handlers[LXOR as usize] = math::lxor;

    handlers[IINC as usize] = math::iinc;
    handlers[I2L as usize] = math::i2l;
    handlers[I2F as usize] = math::i2f;
    handlers[I2D as usize] = math::i2d;
    handlers[L2I as usize] = math::l2i;
    handlers[L2F as usize] = math::l2f;
    handlers[L2D as usize] = math::l2d;
    handlers[F2I as usize] = math::f2i;
    handlers[F2L as usize] = math::f2l;
    handlers[F2D as usize] = math::f2d;
    handlers[D2I as usize] = math::d2i;
    handlers[D2L as usize] = math::d2l;
    handlers[D2F as usize] = math::d2f;
    handlers[I2B as usize] = math::i2b;
    handlers[I2C as usize] = math::i2c;
    handlers[I2S as usize] = math::i2s;

    handlers[LCMP as usize] = math::lcmp;
    handlers[FCMPL as usize] = math::fcmpl;
    handlers[FCMPG as usize] = math::fcmpg;
    handlers[DCMPL as usize] = math::dcmpl;
    handlers[DCMPG as usize] = math::dcmpg;

    handlers[IFEQ as usize] = control_flow::ifeq;
    handlers[IFNE as usize] = control_flow::ifne;
    handlers[IFLT as usize] = control_flow::iflt;
    handlers[IFGE as usize] = control_flow::ifge;
    handlers[IFGT as usize] = control_flow::ifgt;
    handlers[IFLE as usize] = control_flow::ifle;

    handlers[IF_ICMPEQ as usize] = control_flow::ificmpeq;
    handlers[IF_ICMPNE as usize] = control_flow::ificmpne;
    handlers[IF_ICMPLT as usize] = control_flow::ificmplt;
    handlers[IF_ICMPGE as usize] = control_flow::ificmpge;
    handlers[IF_ICMPGT as usize] = control_flow::ificmpgt;
    handlers[IF_ICMPLE as usize] = control_flow::ificmple;
    handlers[IF_ACMPEQ as usize] = control_flow::ifacmpeq;
    handlers[IF_ACMPNE as usize] = control_flow::ifacmpne;
    handlers[GOTO as usize] = control_flow::goto;
    handlers[JSR as usize] = control_flow::jsr;
    handlers[RET as usize] = control_flow::ret;
    handlers[GOTO_W as usize] = control_flow::gotow;
    handlers[JSR_W as usize] = control_flow::jsrw;
    handlers[IFNULL as usize] = control_flow::ifnull;
    handlers[IFNONNULL as usize] = control_flow::ifnonnull;

    handlers[IRETURN as usize] = control_flow::ireturn;
    handlers[LRETURN as usize] = control_flow::lreturn;
    handlers[FRETURN as usize] = control_flow::freturn;
    handlers[DRETURN as usize] = control_flow::dreturn;
    handlers[ARETURN as usize] = control_flow::areturn;
    handlers[RETURN as usize] = control_flow::returnvoid;

    handlers[GETSTATIC as usize] = field::getstatic;
    handlers[PUTSTATIC as usize] = field::putstatic;
    handlers[GETFIELD as usize] = field::getfield;
    handlers[PUTFIELD as usize] = field::putfield;

    handlers[INVOKEVIRTUAL as usize] = invoke::invokevirtual;
    handlers[INVOKESTATIC as usize] = invoke::invokestatic;

    handlers[NEWARRAY as usize] = array::newarray;
    handlers[ARRAYLENGTH as usize] = array::arraylength;

    handlers[INSTANCEOF as usize] = misc::instanceof;

    handlers[BREAKPOINT as usize] = misc::reserved;
    handlers[IMPDEP1 as usize] = misc::reserved;
    handlers[IMPDEP2 as usize] = misc::reserved;
}
