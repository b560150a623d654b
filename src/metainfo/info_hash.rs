use super::error::MetainfoError;
use crate::constants::SHA1_HASH_LEN;
use sha1::{Digest, Sha1};
use std::fmt;

/// The SHA1 digest of a torrent's bencoded info dictionary.
///
/// This is the identifier trackers and peers use for the torrent.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InfoHash([u8; SHA1_HASH_LEN]);

impl InfoHash {
    /// Hashes the canonical bencoded bytes of an info dictionary.
    pub fn from_info_bytes(raw_info: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(raw_info);
        InfoHash(hasher.finalize().into())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MetainfoError> {
        let arr: [u8; SHA1_HASH_LEN] = bytes
            .try_into()
            .map_err(|_| MetainfoError::InvalidInfoHashLength(bytes.len()))?;
        Ok(InfoHash(arr))
    }

    pub fn from_hex(s: &str) -> Result<Self, MetainfoError> {
        let bytes = hex::decode(s)?;
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SHA1_HASH_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; SHA1_HASH_LEN]> for InfoHash {
    fn from(bytes: [u8; SHA1_HASH_LEN]) -> Self {
        InfoHash(bytes)
    }
}

impl fmt::Debug for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InfoHash({})", self.to_hex())
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
