//! The constant pool: a 1-indexed table of tagged literals and symbolic
//! references shared by everything else in a class file.

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};
use log::debug;

use crate::error::{ParseError, Result};

pub const TAG_UTF8: u8 = 1;
pub const TAG_INTEGER: u8 = 3;
pub const TAG_FLOAT: u8 = 4;
pub const TAG_LONG: u8 = 5;
pub const TAG_DOUBLE: u8 = 6;
pub const TAG_CLASS: u8 = 7;
pub const TAG_STRING: u8 = 8;
pub const TAG_FIELD_REF: u8 = 9;
pub const TAG_METHOD_REF: u8 = 10;
pub const TAG_INTERFACE_METHOD_REF: u8 = 11;
pub const TAG_NAME_AND_TYPE: u8 = 12;
pub const TAG_METHOD_HANDLE: u8 = 15;
pub const TAG_METHOD_TYPE: u8 = 16;
pub const TAG_INVOKE_DYNAMIC: u8 = 18;
pub const TAG_MODULE: u8 = 19;
pub const TAG_PACKAGE: u8 = 20;

/// One constant pool entry, payload decoded bit-for-bit from the class file.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Utf8(String),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class { name_index: u16 },
    String { string_index: u16 },
    FieldRef { class_index: u16, name_and_type_index: u16 },
    MethodRef { class_index: u16, name_and_type_index: u16 },
    InterfaceMethodRef { class_index: u16, name_and_type_index: u16 },
    NameAndType { name_index: u16, descriptor_index: u16 },
    MethodHandle { reference_kind: u8, reference_index: u16 },
    MethodType { descriptor_index: u16 },
    InvokeDynamic { bootstrap_method_index: u16, name_and_type_index: u16 },
    Module { name_index: u16 },
    Package { name_index: u16 },
}

impl Item {
    /// Reads a single tagged item from the stream.
    pub fn read<R: Read>(r: &mut R) -> Result<Item> {
        let tag = r.read_u8()?;
        let item = match tag {
            TAG_UTF8 => {
                let length = r.read_u16::<BigEndian>()? as usize;
                let mut bytes = vec![0u8; length];
                r.read_exact(&mut bytes)?;
                Item::Utf8(String::from_utf8(bytes).map_err(|_| ParseError::BadUtf8)?)
            }
            TAG_INTEGER => Item::Integer(r.read_i32::<BigEndian>()?),
            TAG_FLOAT => Item::Float(r.read_f32::<BigEndian>()?),
            TAG_LONG => Item::Long(r.read_i64::<BigEndian>()?),
            TAG_DOUBLE => Item::Double(r.read_f64::<BigEndian>()?),
            TAG_CLASS => Item::Class { name_index: r.read_u16::<BigEndian>()? },
            TAG_STRING => Item::String { string_index: r.read_u16::<BigEndian>()? },
            TAG_FIELD_REF => Item::FieldRef {
                class_index: r.read_u16::<BigEndian>()?,
                name_and_type_index: r.read_u16::<BigEndian>()?,
            },
            TAG_METHOD_REF => Item::MethodRef {
                class_index: r.read_u16::<BigEndian>()?,
                name_and_type_index: r.read_u16::<BigEndian>()?,
            },
            TAG_INTERFACE_METHOD_REF => Item::InterfaceMethodRef {
                class_index: r.read_u16::<BigEndian>()?,
                name_and_type_index: r.read_u16::<BigEndian>()?,
            },
            TAG_NAME_AND_TYPE => Item::NameAndType {
                name_index: r.read_u16::<BigEndian>()?,
                descriptor_index: r.read_u16::<BigEndian>()?,
            },
            TAG_METHOD_HANDLE => Item::MethodHandle {
                reference_kind: r.read_u8()?,
                reference_index: r.read_u16::<BigEndian>()?,
            },
            TAG_METHOD_TYPE => Item::MethodType { descriptor_index: r.read_u16::<BigEndian>()? },
            TAG_INVOKE_DYNAMIC => Item::InvokeDynamic {
                bootstrap_method_index: r.read_u16::<BigEndian>()?,
                name_and_type_index: r.read_u16::<BigEndian>()?,
            },
            TAG_MODULE => Item::Module { name_index: r.read_u16::<BigEndian>()? },
            TAG_PACKAGE => Item::Package { name_index: r.read_u16::<BigEndian>()? },
            other => return Err(ParseError::UnknownTag(other)),
        };
        Ok(item)
    }

    pub fn tag(&self) -> u8 {
        match self {
            Item::Utf8(_) => TAG_UTF8,
            Item::Integer(_) => TAG_INTEGER,
            Item::Float(_) => TAG_FLOAT,
            Item::Long(_) => TAG_LONG,
            Item::Double(_) => TAG_DOUBLE,
            Item::Class { .. } => TAG_CLASS,
            Item::String { .. } => TAG_STRING,
            Item::FieldRef { .. } => TAG_FIELD_REF,
            Item::MethodRef { .. } => TAG_METHOD_REF,
            Item::InterfaceMethodRef { .. } => TAG_INTERFACE_METHOD_REF,
            Item::NameAndType { .. } => TAG_NAME_AND_TYPE,
            Item::MethodHandle { .. } => TAG_METHOD_HANDLE,
            Item::MethodType { .. } => TAG_METHOD_TYPE,
            Item::InvokeDynamic { .. } => TAG_INVOKE_DYNAMIC,
            Item::Module { .. } => TAG_MODULE,
            Item::Package { .. } => TAG_PACKAGE,
        }
    }
}

/// Immutable, 1-indexed constant table. Index 0 is invalid and faults on
/// lookup. Long and Double items occupy a single index here; the reader does
/// not reserve a second slot for them.
#[derive(Debug)]
pub struct ConstantPool {
    items: Vec<Item>,
}

impl ConstantPool {
    /// Reads `count - 1` items from the stream, as declared by the class
    /// file's `constant_pool_count`.
    pub fn parse<R: Read>(count: u16, r: &mut R) -> Result<ConstantPool> {
        let mut items = Vec::with_capacity(count.saturating_sub(1) as usize);
        for _ in 1..count {
            items.push(Item::read(r)?);
        }
        debug!("constant pool: {} items", items.len());
        Ok(ConstantPool { items })
    }

    /// Declared pool size, including the unusable index 0.
    pub fn size(&self) -> usize {
        self.items.len() + 1
    }

    pub fn item(&self, index: u16) -> Result<&Item> {
        if index == 0 {
            return Err(ParseError::ZeroIndex);
        }
        self.items.get(index as usize - 1).ok_or(ParseError::BadIndex(index))
    }

    /// Resolves a Utf8 item to its string.
    pub fn string(&self, index: u16) -> Result<&str> {
        match self.item(index)? {
            Item::Utf8(value) => Ok(value),
            _ => Err(ParseError::WrongItemType(index)),
        }
    }

    /// Resolves a Class item through its backing Utf8.
    pub fn class_name(&self, index: u16) -> Result<&str> {
        match self.item(index)? {
            Item::Class { name_index } => self.string(*name_index),
            _ => Err(ParseError::WrongItemType(index)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn item(data: &[u8]) -> Item {
        let pool = ConstantPool::parse(2, &mut Cursor::new(data)).unwrap();
        pool.item(1).unwrap().clone()
    }

    #[test]
    fn utf8_item() {
        let it = item(&[0x01, 0x00, 0x06, b'a', b'l', b'b', b'l', b'u', b'e']);
        assert_eq!(1, it.tag());
        assert_eq!(Item::Utf8("alblue".into()), it);
    }

    #[test]
    fn numeric_items() {
        assert_eq!(Item::Integer(1), item(&[0x03, 0x00, 0x00, 0x00, 0x01]));
        assert_eq!(Item::Float(f32::INFINITY), item(&[0x04, 0x7f, 0x80, 0x00, 0x00]));
        assert_eq!(
            Item::Long(2),
            item(&[0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02])
        );
        assert_eq!(
            Item::Double(f64::NEG_INFINITY),
            item(&[0x06, 0xff, 0xf0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00])
        );
    }

    #[test]
    fn reference_items() {
        assert_eq!(Item::Class { name_index: 0x104 }, item(&[0x07, 0x01, 0x04]));
        assert_eq!(Item::String { string_index: 0x304 }, item(&[0x08, 0x03, 0x04]));
        assert_eq!(
            Item::FieldRef { class_index: 0x112, name_and_type_index: 0x314 },
            item(&[0x09, 0x01, 0x12, 0x03, 0x14])
        );
        assert_eq!(
            Item::MethodRef { class_index: 0x122, name_and_type_index: 0x324 },
            item(&[0x0a, 0x01, 0x22, 0x03, 0x24])
        );
        assert_eq!(
            Item::InterfaceMethodRef { class_index: 0x122, name_and_type_index: 0x324 },
            item(&[0x0b, 0x01, 0x22, 0x03, 0x24])
        );
        assert_eq!(
            Item::NameAndType { name_index: 0x102, descriptor_index: 0x304 },
            item(&[0x0c, 0x01, 0x02, 0x03, 0x04])
        );
        assert_eq!(
            Item::MethodHandle { reference_kind: 3, reference_index: 0x504 },
            item(&[0x0f, 0x03, 0x05, 0x04])
        );
        assert_eq!(Item::MethodType { descriptor_index: 0x504 }, item(&[0x10, 0x05, 0x04]));
        assert_eq!(
            Item::InvokeDynamic { bootstrap_method_index: 0x222, name_and_type_index: 0x424 },
            item(&[0x12, 0x02, 0x22, 0x04, 0x24])
        );
        assert_eq!(Item::Module { name_index: 0x402 }, item(&[0x13, 0x04, 0x02]));
        assert_eq!(Item::Package { name_index: 0x747 }, item(&[0x14, 0x07, 0x47]));
    }

    #[test]
    fn unknown_tag() {
        let err = ConstantPool::parse(2, &mut Cursor::new(&[0x02u8][..])).unwrap_err();
        assert!(matches!(err, ParseError::UnknownTag(2)));
    }

    #[test]
    fn pool_lookups() {
        let empty = ConstantPool::parse(1, &mut Cursor::new(&[][..])).unwrap();
        assert!(matches!(empty.item(0), Err(ParseError::ZeroIndex)));
        assert_eq!(1, empty.size());

        let bytes: &[u8] = &[
            0x01, 0x00, 0x06, b'a', b'l', b'b', b'l', b'u', b'e', // Utf8 item
            0x07, 0x00, 0x01, // Class item
        ];
        let single = ConstantPool::parse(3, &mut Cursor::new(bytes)).unwrap();
        assert_eq!("alblue", single.string(1).unwrap());
        assert_eq!("alblue", single.class_name(2).unwrap());
        assert_eq!(3, single.size());
        assert!(matches!(single.string(2), Err(ParseError::WrongItemType(2))));
        assert!(matches!(single.item(9), Err(ParseError::BadIndex(9))));
    }

    #[test]
    fn truncated_item() {
        let err = ConstantPool::parse(2, &mut Cursor::new(&[0x03u8, 0x00][..])).unwrap_err();
        assert!(matches!(err, ParseError::Truncated(_)));
    }
}
