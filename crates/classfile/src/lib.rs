//! Parser for the JVM class file format.
//!
//! Decodes the binary container — constant pool, field and method tables,
//! attributes — into plain data the interpreter can resolve symbolic
//! references against. Purely structural: no verification is performed.

pub mod attribute;
pub mod class;
pub mod constant_pool;
pub mod descriptor;
pub mod error;
pub mod member;

pub use attribute::Attribute;
pub use class::JavaClass;
pub use constant_pool::{ConstantPool, Item};
pub use descriptor::MethodDescriptor;
pub use error::ParseError;
pub use member::Member;
