//! A stack-based JVM bytecode interpreter with a host reflection bridge.
//!
//! The [`classfile`] crate decodes the binary class format; a [`Frame`]
//! interprets one method's bytecode against typed [`Slot`]s, resolving
//! field and method symbols through an injected [`HostEnv`] registry
//! instead of recursing into further interpreted frames.

pub mod exec;
pub mod model;
pub mod opcodes;

pub use exec::env::{HostClass, HostEnv};
pub use exec::frame::Frame;
pub use model::{HostObject, HostRef, HostValue, OperandStack, Slot, VmError, VmResult};
