//! Limits and well-known keys.
//!
//! This module contains the default bounds applied while decoding bencode and
//! reading torrent files, plus the dictionary key names defined by BEP-3 and
//! BEP-12.

// ============================================================================
// Decoder limits
// ============================================================================

/// Maximum length of a single bencode byte string (10 MiB)
pub const MAX_BYTE_STRING_LENGTH: usize = 10 * 1024 * 1024;

/// Maximum nesting depth of lists and dictionaries
pub const MAX_NESTING_DEPTH: usize = 64;

/// Maximum number of bytes pulled from a reader before decoding (10 MiB)
pub const MAX_INPUT_LENGTH: usize = 10 * 1024 * 1024;

// ============================================================================
// Metainfo limits
// ============================================================================

/// Maximum size of a `.torrent` file accepted by the parser (10 MiB)
pub const MAX_TORRENT_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Length of a SHA1 piece hash and of a v1 info hash
pub const SHA1_HASH_LEN: usize = 20;

// ============================================================================
// Root dictionary keys
// ============================================================================

pub const KEY_ANNOUNCE: &str = "announce";
pub const KEY_ANNOUNCE_LIST: &str = "announce-list";
pub const KEY_COMMENT: &str = "comment";
pub const KEY_CREATED_BY: &str = "created by";
pub const KEY_CREATION_DATE: &str = "creation date";
pub const KEY_ENCODING: &str = "encoding";
pub const KEY_INFO: &str = "info";

// ============================================================================
// Info dictionary keys
// ============================================================================

pub const KEY_FILES: &str = "files";
pub const KEY_LENGTH: &str = "length";
pub const KEY_NAME: &str = "name";
pub const KEY_PATH: &str = "path";
pub const KEY_PIECE_LENGTH: &str = "piece length";
pub const KEY_PIECES: &str = "pieces";
pub const KEY_PRIVATE: &str = "private";
