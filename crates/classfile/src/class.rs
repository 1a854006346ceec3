//! Top-level class file reader.

use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt};
use log::debug;

use crate::attribute::Attribute;
use crate::constant_pool::ConstantPool;
use crate::error::{ParseError, Result};
use crate::member::Member;

const MAGIC: u32 = 0xcafe_babe;

/// A parsed class file.
#[derive(Debug)]
pub struct JavaClass {
    pub minor: u16,
    pub major: u16,
    pub pool: ConstantPool,
    pub flags: u16,
    pub this_class: String,
    pub super_class: String,
    pub interfaces: Vec<String>,
    pub fields: Vec<Member>,
    pub methods: Vec<Member>,
    pub attributes: Vec<Attribute>,
}

impl JavaClass {
    /// Decodes a class from its serialized bytes. Structural decoding only;
    /// no bytecode verification happens here.
    pub fn parse(bytes: &[u8]) -> Result<JavaClass> {
        let mut r = Cursor::new(bytes);
        if r.read_u32::<BigEndian>()? != MAGIC {
            return Err(ParseError::BadMagic);
        }
        let minor = r.read_u16::<BigEndian>()?;
        let major = r.read_u16::<BigEndian>()?;
        let pool_count = r.read_u16::<BigEndian>()?;
        let pool = ConstantPool::parse(pool_count, &mut r)?;
        let flags = r.read_u16::<BigEndian>()?;
        let this_index = r.read_u16::<BigEndian>()?;
        let super_index = r.read_u16::<BigEndian>()?;
        let this_class = pool.class_name(this_index)?.to_string();
        let super_class = pool.class_name(super_index)?.to_string();

        let interface_count = r.read_u16::<BigEndian>()?;
        let mut interfaces = Vec::with_capacity(interface_count as usize);
        for _ in 0..interface_count {
            let index = r.read_u16::<BigEndian>()?;
            interfaces.push(pool.class_name(index)?.to_string());
        }

        let fields = read_members(&mut r, &pool)?;
        let methods = read_members(&mut r, &pool)?;
        let attributes = read_attributes(&mut r, &pool)?;
        debug!(
            "parsed class {} ({} fields, {} methods)",
            this_class,
            fields.len(),
            methods.len()
        );

        Ok(JavaClass {
            minor,
            major,
            pool,
            flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }

    /// Linear scan for a class-level attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    /// First method with the given name.
    pub fn method(&self, name: &str) -> Option<&Member> {
        self.methods.iter().find(|m| m.name == name)
    }
}

fn read_members(r: &mut Cursor<&[u8]>, pool: &ConstantPool) -> Result<Vec<Member>> {
    let count = r.read_u16::<BigEndian>()?;
    let mut members = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let flags = r.read_u16::<BigEndian>()?;
        let name = pool.string(r.read_u16::<BigEndian>()?)?.to_string();
        let descriptor = pool.string(r.read_u16::<BigEndian>()?)?.to_string();
        let attributes = read_attributes(r, pool)?;
        members.push(Member::new(flags, name, descriptor, attributes));
    }
    Ok(members)
}

fn read_attributes(r: &mut Cursor<&[u8]>, pool: &ConstantPool) -> Result<Vec<Attribute>> {
    let count = r.read_u16::<BigEndian>()?;
    let mut attributes = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let name = pool.string(r.read_u16::<BigEndian>()?)?.to_string();
        let length = r.read_u32::<BigEndian>()? as usize;
        let mut data = vec![0u8; length];
        r.read_exact(&mut data)?;
        attributes.push(Attribute::of(&name, pool, data)?);
    }
    Ok(attributes)
}
