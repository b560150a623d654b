//! Torrent metainfo handling ([BEP-3], [BEP-12]).
//!
//! A torrent file (`.torrent`) is a bencoded dictionary describing the
//! content to be shared:
//! - File names, sizes, and directory structure
//! - Piece hashes for data integrity verification
//! - Tracker URLs for peer discovery
//!
//! [`Metainfo`] is the parsed, validated form of such a file.
//!
//! # Examples
//!
//! ```no_run
//! use metabit::metainfo::Metainfo;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let torrent = Metainfo::from_file("example.torrent")?;
//!
//! println!("Name: {}", torrent.info.name);
//! println!("Info hash: {}", torrent.info_hash);
//! println!("Piece length: {} bytes", torrent.info.piece_length);
//! println!("Number of pieces: {}", torrent.info.piece_count());
//!
//! for file in &torrent.info.files {
//!     println!("  {} ({} bytes)", file.path.join("/"), file.length);
//! }
//!
//! for tracker in torrent.trackers() {
//!     println!("Tracker: {}", tracker);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Torrent Structure
//!
//! - **info** - Core torrent metadata (hashed to create the info hash)
//!   - `name` - Suggested file/directory name
//!   - `piece length` - Size of each piece in bytes
//!   - `pieces` - Concatenated SHA1 hashes of each piece
//!   - `length` - Total size (single-file) OR `files` list (multi-file)
//!   - `private` - Optional private-tracker flag
//! - **announce** - Primary tracker URL
//! - **announce-list** - Additional tracker tiers (BEP-12)
//! - **creation date** - Unix timestamp when created
//! - **comment** - Optional comment
//! - **created by** - Client that created the torrent
//! - **encoding** - Character encoding of the text fields
//!
//! # Failure policy
//!
//! Missing or malformed required fields fail the parse with a
//! [`MetainfoError`]. Optional fields that are present but unusable are left
//! unset and reported through [`Metainfo::diagnostics`].
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html
//! [BEP-12]: http://bittorrent.org/beps/bep_0012.html

mod diagnostic;
mod error;
mod info_hash;
mod path;
mod torrent;

pub use diagnostic::Diagnostic;
pub use error::MetainfoError;
pub use info_hash::InfoHash;
pub use torrent::{File, Info, Metainfo, ParseOptions};

#[cfg(test)]
mod tests;
