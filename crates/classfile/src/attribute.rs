//! Attribute records, re-dispatched by name once the raw payload is read.

use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt};

use crate::constant_pool::ConstantPool;
use crate::error::Result;

pub const CODE: &str = "Code";
pub const SOURCE_FILE: &str = "SourceFile";

#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// Method body: operand stack / locals sizing plus the raw bytecode.
    /// The exception table and nested attributes that follow the code bytes
    /// are not decoded.
    Code { max_stack: u16, max_locals: u16, bytecode: Vec<u8> },
    SourceFile { file: String },
    /// Anything unrecognized is retained verbatim rather than dropped.
    Unknown { name: String, data: Vec<u8> },
}

impl Attribute {
    /// Reinterprets an attribute payload according to its name.
    pub fn of(name: &str, pool: &ConstantPool, data: Vec<u8>) -> Result<Attribute> {
        match name {
            CODE => {
                let mut cursor = Cursor::new(data.as_slice());
                let max_stack = cursor.read_u16::<BigEndian>()?;
                let max_locals = cursor.read_u16::<BigEndian>()?;
                let code_length = cursor.read_u32::<BigEndian>()? as usize;
                let mut bytecode = vec![0u8; code_length];
                cursor.read_exact(&mut bytecode)?;
                Ok(Attribute::Code { max_stack, max_locals, bytecode })
            }
            SOURCE_FILE => {
                let mut cursor = Cursor::new(data.as_slice());
                let index = cursor.read_u16::<BigEndian>()?;
                Ok(Attribute::SourceFile { file: pool.string(index)?.to_string() })
            }
            _ => Ok(Attribute::Unknown { name: name.to_string(), data }),
        }
    }

    /// The attribute's name, whether decoded or retained as unknown.
    pub fn name(&self) -> &str {
        match self {
            Attribute::Code { .. } => CODE,
            Attribute::SourceFile { .. } => SOURCE_FILE,
            Attribute::Unknown { name, .. } => name,
        }
    }
}
