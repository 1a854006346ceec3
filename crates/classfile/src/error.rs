use std::io;

/// Faults raised while decoding a class file or looking up parsed data.
///
/// Construction of a [`crate::JavaClass`] either completes or fails with one
/// of these; there is no partially-parsed result.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("content is not a class file")]
    BadMagic,

    #[error("unable to parse bytecode")]
    Truncated(#[from] io::Error),

    #[error("unknown constant pool tag {0}")]
    UnknownTag(u8),

    #[error("constant pool is 1-indexed")]
    ZeroIndex,

    #[error("constant pool index {0} out of range")]
    BadIndex(u16),

    #[error("wrong constant pool item type at index {0}")]
    WrongItemType(u16),

    #[error("constant pool string is not valid UTF-8")]
    BadUtf8,

    #[error("invalid descriptor: {0}")]
    BadDescriptor(String),
}

pub type Result<T> = std::result::Result<T, ParseError>;
