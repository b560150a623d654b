use thiserror::Error;

#[derive(Debug, Error)]
pub enum BencodeError {
    #[error("unexpected end of input at offset {0}")]
    UnexpectedEof(usize),

    #[error("invalid integer at offset {offset}: {reason}")]
    InvalidInteger { offset: usize, reason: &'static str },

    #[error("invalid string length at offset {0}")]
    InvalidStringLength(usize),

    #[error("byte string of {len} bytes at offset {offset} exceeds limit of {max}")]
    ByteStringTooLong { offset: usize, len: usize, max: usize },

    #[error("unexpected byte 0x{byte:02x} at offset {offset}")]
    UnexpectedByte { byte: u8, offset: usize },

    #[error("dictionary key at offset {offset} is a {found}, expected byte string")]
    NonStringKey { offset: usize, found: &'static str },

    #[error("trailing data after value at offset {0}")]
    TrailingData(usize),

    #[error("nesting too deep at offset {0}")]
    NestingTooDeep(usize),

    #[error("input exceeds limit of {0} bytes")]
    InputTooLarge(usize),

    #[error("expected {expected}, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("byte string is not valid utf-8")]
    InvalidUtf8,

    #[error("list element {index}: {source}")]
    ListElement {
        index: usize,
        #[source]
        source: Box<BencodeError>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
