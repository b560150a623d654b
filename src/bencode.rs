//! Bencode encoding and decoding ([BEP-3]).
//!
//! Bencode is the serialization format used throughout BitTorrent for storing
//! and transmitting structured data, including `.torrent` files and tracker
//! responses.
//!
//! # Data Types
//!
//! Bencode supports four data types:
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! Integers have no redundant leading zeros and no negative zero, so every
//! integer has exactly one encoding. Dictionaries are always encoded with
//! their keys in ascending byte order. Together these make the encoding of a
//! value canonical, which is what allows info hashes to be reproduced.
//!
//! # Examples
//!
//! ```
//! use metabit::bencode::{decode, encode, Value};
//!
//! let value = decode(b"l4:spam4:eggse").unwrap();
//! let list = value.as_list().unwrap();
//! assert_eq!(list[0].as_str(), Some("spam"));
//!
//! // Keys come back out sorted
//! let value = decode(b"d4:spam4:eggs3:cow3:mooe").unwrap();
//! assert_eq!(encode(&value).unwrap(), b"d3:cow3:moo4:spam4:eggse");
//! ```
//!
//! # Limits
//!
//! [`DecodeOptions`] bounds byte string length and nesting depth. The
//! defaults (10 MiB, 64 levels) are used by [`decode`].
//!
//! # Error Handling
//!
//! Decoding can fail for various reasons, each reported with the offset
//! where it was detected:
//!
//! - [`BencodeError::UnexpectedEof`] - Input ended unexpectedly
//! - [`BencodeError::InvalidInteger`] - Malformed integer (e.g., leading zeros)
//! - [`BencodeError::UnexpectedByte`] - A byte that cannot start a value
//! - [`BencodeError::NonStringKey`] - A dictionary key that is not a byte string
//! - [`BencodeError::ByteStringTooLong`] - A byte string above the configured limit
//! - [`BencodeError::NestingTooDeep`] - Recursion limit exceeded
//! - [`BencodeError::TrailingData`] - Extra data after the value
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod decode;
mod display;
mod encode;
mod error;
mod value;

pub use decode::{decode, decode_reader, decode_with, DecodeOptions};
pub use encode::{encode, encode_to};
pub use error::BencodeError;
pub use value::Value;
