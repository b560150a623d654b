//! metabit - Bencode and torrent metainfo
//!
//! This library decodes and encodes bencode and turns `.torrent` files into
//! validated, strongly typed metadata, including the info hash that identifies
//! a torrent to trackers and peers.
//!
//! # Modules
//!
//! - [`bencode`] - BEP-3 Bencode encoding/decoding
//! - [`metainfo`] - BEP-3/12 Torrent metainfo parsing and info hashes
//! - [`constants`] - Default limits and dictionary keys

pub mod bencode;
pub mod constants;
pub mod metainfo;

pub use bencode::{decode, encode, BencodeError, DecodeOptions, Value};
pub use metainfo::{Diagnostic, File, Info, InfoHash, Metainfo, MetainfoError, ParseOptions};
