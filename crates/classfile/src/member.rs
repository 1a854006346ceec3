//! Field and method table entries.

use crate::attribute::{self, Attribute};
use crate::descriptor;
use crate::error::Result;

/// A field or method record: access flags, name, descriptor and attributes.
#[derive(Debug, Clone)]
pub struct Member {
    pub flags: u16,
    pub name: String,
    pub descriptor: String,
    pub attributes: Vec<Attribute>,
}

impl Member {
    pub fn new(flags: u16, name: String, descriptor: String, attributes: Vec<Attribute>) -> Member {
        Member { flags, name, descriptor, attributes }
    }

    /// Linear scan for an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    pub fn code_attribute(&self) -> Option<&Attribute> {
        self.attribute(attribute::CODE)
    }

    /// Argument type list derived by scanning the method descriptor.
    pub fn argument_types(&self) -> Result<Vec<String>> {
        Ok(descriptor::parse_method_descriptor(&self.descriptor)?.parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constant_pool::ConstantPool;
    use std::io::Cursor;

    fn empty_pool() -> ConstantPool {
        ConstantPool::parse(1, &mut Cursor::new(&[][..])).unwrap()
    }

    #[test]
    fn field_member() {
        let field = Member::new(12, "MyField".into(), "[I".into(), Vec::new());
        assert_eq!(12, field.flags);
        assert_eq!("MyField", field.name);
        assert_eq!("[I", field.descriptor);
        assert!(field.attribute("Unknown").is_none());
    }

    #[test]
    fn method_member() {
        let pool = empty_pool();
        let attributes = vec![
            Attribute::of("Code", &pool, vec![0x00, 0x01, 0x00, 0x03, 0x00, 0x00, 0x00, 0x00])
                .unwrap(),
            Attribute::of("Unknown", &pool, b"Unknown".to_vec()).unwrap(),
        ];
        let method = Member::new(34, "MyMethod".into(), "([I)V".into(), attributes);
        assert_eq!(34, method.flags);
        assert_eq!("Unknown", method.attribute("Unknown").unwrap().name());
        match method.code_attribute().unwrap() {
            Attribute::Code { bytecode, .. } => assert!(bytecode.is_empty()),
            other => panic!("not a code attribute: {:?}", other),
        }
        assert_eq!(vec!["[I"], method.argument_types().unwrap());
    }

    #[test]
    fn argument_scan() {
        let method =
            Member::new(0, "m".into(), "(IJLjava/lang/String;D)V".into(), Vec::new());
        assert_eq!(
            vec!["I", "J", "Ljava/lang/String;", "D"],
            method.argument_types().unwrap()
        );
    }
}
