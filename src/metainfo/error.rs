use std::path::PathBuf;

use thiserror::Error;

use crate::bencode::BencodeError;

/// Errors that abort parsing of a torrent file.
///
/// Problems with optional fields never surface here; they are recorded as
/// [`Diagnostic`](super::Diagnostic)s on the parsed [`Metainfo`](super::Metainfo).
#[derive(Debug, Error)]
pub enum MetainfoError {
    /// The torrent file contains invalid bencode.
    #[error("bencode error: {0}")]
    Bencode(#[from] BencodeError),

    /// The top-level value is not a dictionary.
    #[error("torrent root is a {0}, expected dictionary")]
    NotADictionary(&'static str),

    /// A required field is missing from the torrent file.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A required field has the wrong bencode type.
    #[error("field {field} is a {found}, expected {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// The name has no usable component left after normalization.
    #[error("invalid name: {0:?}")]
    InvalidName(String),

    /// The piece length is zero or negative.
    #[error("piece length must be positive, got {0}")]
    InvalidPieceLength(i64),

    /// The pieces field is not a whole number of 20-byte hashes.
    #[error("pieces length {0} is not a multiple of 20")]
    InvalidPiecesLength(usize),

    /// The single-file length is negative.
    #[error("length must not be negative, got {0}")]
    InvalidLength(i64),

    /// The multi-file list has no entries.
    #[error("files list is empty")]
    EmptyFileList,

    /// An entry in the multi-file list is malformed.
    #[error("invalid file entry {index}: {reason}")]
    InvalidFile { index: usize, reason: String },

    /// An info hash was built from the wrong number of bytes (must be 20).
    #[error("invalid info hash length: {0}")]
    InvalidInfoHashLength(usize),

    /// An info hash string is not valid hexadecimal.
    #[error("invalid info hash hex: {0}")]
    InvalidInfoHashHex(#[from] hex::FromHexError),

    /// The torrent file is larger than the configured limit.
    #[error("{}: file size {size} exceeds limit of {max} bytes", .path.display())]
    FileTooLarge { path: PathBuf, size: u64, max: u64 },

    /// An I/O error occurred while reading the torrent file.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
