use super::diagnostic::Diagnostic;
use super::error::MetainfoError;
use super::info_hash::InfoHash;
use super::path::{check_path_component, clean_path, normalize_name};
use crate::bencode::{decode_with, encode, DecodeOptions, Value};
use crate::constants::*;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

type Dict = BTreeMap<Bytes, Value>;

/// Limits applied while loading a torrent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Largest `.torrent` file [`Metainfo::from_file_with`] will read, in bytes.
    pub max_file_size: u64,
    /// Limits for the underlying bencode decoder.
    ///
    /// The default tolerates bytes after the root dictionary (a trailing
    /// newline is common in real files).
    pub decode: DecodeOptions,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_file_size: MAX_TORRENT_FILE_SIZE,
            decode: DecodeOptions {
                allow_trailing_data: true,
                ..DecodeOptions::default()
            },
        }
    }
}

/// A parsed torrent file.
///
/// Contains all metadata from a `.torrent` file, including file information,
/// piece hashes, and tracker URLs.
///
/// # Examples
///
/// ```no_run
/// use metabit::metainfo::Metainfo;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let metainfo = Metainfo::from_file("example.torrent")?;
///
/// println!("Torrent: {}", metainfo.info.name);
/// println!("Size: {} bytes", metainfo.info.total_length());
/// println!("Info hash: {}", metainfo.info_hash);
/// for diagnostic in metainfo.diagnostics() {
///     println!("warning: {}", diagnostic);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Metainfo {
    /// The info dictionary containing file and piece information.
    pub info: Info,
    /// The unique identifier for this torrent (hash of the info dictionary).
    pub info_hash: InfoHash,
    /// Primary tracker URL.
    pub announce: String,
    /// Multi-tier tracker list ([BEP-12](http://bittorrent.org/beps/bep_0012.html)).
    pub announce_list: Option<Vec<Vec<String>>>,
    /// Unix timestamp when the torrent was created.
    pub creation_date: Option<i64>,
    /// Optional comment about the torrent.
    pub comment: Option<String>,
    /// Name/version of the program that created the torrent.
    pub created_by: Option<String>,
    /// String encoding used for the text fields of the info dictionary.
    pub encoding: Option<String>,
    raw_info: Bytes,
    diagnostics: Vec<Diagnostic>,
}

/// The info dictionary from a torrent file.
///
/// The SHA1 hash of this dictionary (in bencode format) is the info hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Info {
    /// File name (single-file) or root directory name (multi-file), reduced
    /// to a single path component.
    pub name: String,
    /// Number of bytes per piece; always positive.
    pub piece_length: u64,
    /// SHA1 hash of each piece (20 bytes each).
    pub pieces: Vec<[u8; SHA1_HASH_LEN]>,
    /// Files in the torrent; never empty.
    pub files: Vec<File>,
    /// The `private` flag exactly as given, `None` when absent.
    pub private: Option<i64>,
    multi_file: bool,
}

/// A file within a torrent.
///
/// In single-file mode the one entry's path is the torrent name. In
/// multi-file mode paths are relative to the root directory named by
/// [`Info::name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// Size of the file in bytes.
    pub length: u64,
    /// Path components, never empty.
    pub path: Vec<String>,
}

impl Metainfo {
    /// Reads and parses a `.torrent` file using the default limits.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is larger than 10 MiB,
    /// or for any of the reasons listed on [`from_bytes`](Self::from_bytes).
    /// I/O errors carry the cleaned path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MetainfoError> {
        Self::from_file_with(path, &ParseOptions::default())
    }

    /// Reads and parses a `.torrent` file with explicit limits.
    ///
    /// The file size is checked before its contents are read.
    pub fn from_file_with(
        path: impl AsRef<Path>,
        options: &ParseOptions,
    ) -> Result<Self, MetainfoError> {
        let path = clean_path(path.as_ref());
        let max = options.max_file_size;
        let io_err = |source: std::io::Error| MetainfoError::Io {
            path: path.clone(),
            source,
        };
        let too_large = |size: u64| MetainfoError::FileTooLarge {
            path: path.clone(),
            size,
            max,
        };

        let file = std::fs::File::open(&path).map_err(io_err)?;
        let size = file.metadata().map_err(io_err)?.len();
        if size > max {
            return Err(too_large(size));
        }

        // The file may grow between the size check and the read.
        let mut data = Vec::with_capacity(size as usize);
        file.take(max + 1).read_to_end(&mut data).map_err(io_err)?;
        if data.len() as u64 > max {
            return Err(too_large(data.len() as u64));
        }

        debug!("read {} bytes from {}", data.len(), path.display());
        Self::from_bytes_with(&data, options)
    }

    /// Parses a torrent file from raw bytes using the default limits.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The data is not valid bencode or its root is not a dictionary
    /// - `announce`, `info`, `name`, `piece length` or `pieces` is missing or mistyped
    /// - The piece length is not positive
    /// - The pieces field length is not a multiple of 20
    /// - Neither a valid `files` list nor a single-file `length` is present
    ///
    /// Wrong-typed optional fields do not fail the parse; see
    /// [`diagnostics`](Self::diagnostics).
    ///
    /// # Examples
    ///
    /// ```
    /// use metabit::metainfo::Metainfo;
    ///
    /// let data = b"d8:announce26:http://tracker.example.com4:infod6:lengthi123456e\
    ///     4:name13:test_file.txt12:piece lengthi262144e\
    ///     6:pieces20:aaaaaaaaaaaaaaaaaaaaee";
    /// let metainfo = Metainfo::from_bytes(data).unwrap();
    ///
    /// assert_eq!(metainfo.announce, "http://tracker.example.com");
    /// assert_eq!(metainfo.info.name, "test_file.txt");
    /// assert_eq!(metainfo.info.files[0].length, 123456);
    /// ```
    pub fn from_bytes(data: &[u8]) -> Result<Self, MetainfoError> {
        Self::from_bytes_with(data, &ParseOptions::default())
    }

    /// Parses a torrent file from raw bytes with explicit limits.
    pub fn from_bytes_with(data: &[u8], options: &ParseOptions) -> Result<Self, MetainfoError> {
        let value = decode_with(data, &options.decode)?;
        let dict = match &value {
            Value::Dict(d) => d,
            other => return Err(MetainfoError::NotADictionary(other.type_name())),
        };

        let mut report = Report::default();
        let announce = report.required_text(dict, KEY_ANNOUNCE)?;

        let info_value = required(dict, KEY_INFO)?;
        let info_dict = info_value
            .as_dict()
            .ok_or_else(|| wrong_type(KEY_INFO, "dictionary", info_value))?;

        let info = parse_info(info_dict, &mut report)?;

        // Hash the info value as decoded, not a rebuild of `Info`, so keys
        // this parser does not model are still covered.
        let raw_info = Bytes::from(encode(info_value)?);
        let info_hash = InfoHash::from_info_bytes(&raw_info);

        let announce_list = report.announce_list(dict);
        let creation_date = report.optional_integer(dict, KEY_CREATION_DATE);
        let comment = report.optional_text(dict, KEY_COMMENT);
        let created_by = report.optional_text(dict, KEY_CREATED_BY);
        let encoding = report.optional_text(dict, KEY_ENCODING);

        debug!(
            "parsed torrent {} ({}): {} pieces, {} files, {} diagnostics",
            info.name,
            info_hash,
            info.pieces.len(),
            info.files.len(),
            report.diagnostics.len()
        );

        Ok(Self {
            info,
            info_hash,
            announce,
            announce_list,
            creation_date,
            comment,
            created_by,
            encoding,
            raw_info,
            diagnostics: report.diagnostics,
        })
    }

    /// Returns the canonical bencoded info dictionary the info hash was computed over.
    pub fn raw_info(&self) -> &Bytes {
        &self.raw_info
    }

    /// Returns the problems found in optional fields, in the order they were met.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns `true` if the torrent explicitly sets `private` to 1.
    pub fn is_private(&self) -> bool {
        self.info.private == Some(1)
    }

    /// Returns all tracker URLs from both `announce` and `announce-list`.
    ///
    /// The primary tracker (from `announce`) comes first, followed by
    /// trackers from `announce-list`. Duplicates are removed.
    pub fn trackers(&self) -> Vec<String> {
        let mut trackers = vec![self.announce.clone()];

        for tier in self.announce_list.iter().flatten() {
            for tracker in tier {
                if !trackers.contains(tracker) {
                    trackers.push(tracker.clone());
                }
            }
        }

        trackers
    }
}

impl Info {
    /// Total size of all files combined.
    pub fn total_length(&self) -> u64 {
        self.files.iter().map(|f| f.length).sum()
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn piece_hash(&self, index: usize) -> Option<&[u8; SHA1_HASH_LEN]> {
        self.pieces.get(index)
    }

    /// Returns `true` if the torrent described its content with a `files` list.
    pub fn is_multi_file(&self) -> bool {
        self.multi_file
    }
}

fn parse_info(dict: &Dict, report: &mut Report) -> Result<Info, MetainfoError> {
    let raw_name = report.required_text(dict, KEY_NAME)?;
    let name = normalize_name(&raw_name).ok_or(MetainfoError::InvalidName(raw_name))?;

    let piece_length = required_integer(dict, KEY_PIECE_LENGTH)?;
    if piece_length <= 0 {
        return Err(MetainfoError::InvalidPieceLength(piece_length));
    }

    let pieces_bytes = required_bytes(dict, KEY_PIECES)?;
    if pieces_bytes.len() % SHA1_HASH_LEN != 0 {
        return Err(MetainfoError::InvalidPiecesLength(pieces_bytes.len()));
    }

    let pieces: Vec<[u8; SHA1_HASH_LEN]> = pieces_bytes
        .chunks_exact(SHA1_HASH_LEN)
        .map(|chunk| {
            let mut arr = [0u8; SHA1_HASH_LEN];
            arr.copy_from_slice(chunk);
            arr
        })
        .collect();

    // A `files` list takes precedence over a root `length`.
    let (files, multi_file) = match lookup(dict, KEY_FILES) {
        Some(value) => (parse_files(value)?, true),
        None => {
            let length = required_integer(dict, KEY_LENGTH)?;
            let length = u64::try_from(length).map_err(|_| MetainfoError::InvalidLength(length))?;
            let file = File {
                length,
                path: vec![name.clone()],
            };
            (vec![file], false)
        }
    };

    let private = report.optional_integer(dict, KEY_PRIVATE);

    Ok(Info {
        name,
        piece_length: piece_length as u64,
        pieces,
        files,
        private,
        multi_file,
    })
}

fn parse_files(value: &Value) -> Result<Vec<File>, MetainfoError> {
    let entries = match value {
        Value::List(l) => l,
        other => return Err(wrong_type(KEY_FILES, "list", other)),
    };

    if entries.is_empty() {
        return Err(MetainfoError::EmptyFileList);
    }

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            parse_file(entry).map_err(|reason| MetainfoError::InvalidFile { index, reason })
        })
        .collect()
}

/// Parses one `files` entry.
///
/// Beyond the type checks, every path component must be a plain file name:
/// empty components, `.`, `..` and anything containing a path separator or
/// NUL are rejected, so a torrent cannot place files outside its root
/// directory. Components must also be valid UTF-8.
fn parse_file(entry: &Value) -> Result<File, String> {
    let dict = entry.try_as_dict().map_err(|e| e.to_string())?;

    let length = lookup(dict, KEY_LENGTH)
        .ok_or_else(|| format!("missing {KEY_LENGTH}"))?
        .try_as_integer()
        .map_err(|e| format!("{KEY_LENGTH}: {e}"))?;
    let length = u64::try_from(length).map_err(|_| format!("negative {KEY_LENGTH} {length}"))?;

    let path = lookup(dict, KEY_PATH)
        .ok_or_else(|| format!("missing {KEY_PATH}"))?
        .string_list()
        .map_err(|e| format!("{KEY_PATH}: {e}"))?;

    if path.is_empty() {
        return Err(format!("empty {KEY_PATH}"));
    }
    for component in &path {
        check_path_component(component).map_err(|e| format!("{KEY_PATH}: {e}"))?;
    }

    Ok(File { length, path })
}

fn lookup<'a>(dict: &'a Dict, key: &str) -> Option<&'a Value> {
    dict.get(key.as_bytes())
}

fn wrong_type(field: &'static str, expected: &'static str, found: &Value) -> MetainfoError {
    MetainfoError::WrongType {
        field,
        expected,
        found: found.type_name(),
    }
}

fn required<'a>(dict: &'a Dict, key: &'static str) -> Result<&'a Value, MetainfoError> {
    lookup(dict, key).ok_or(MetainfoError::MissingField(key))
}

fn required_integer(dict: &Dict, key: &'static str) -> Result<i64, MetainfoError> {
    match required(dict, key)? {
        Value::Integer(i) => Ok(*i),
        other => Err(wrong_type(key, "integer", other)),
    }
}

fn required_bytes<'a>(dict: &'a Dict, key: &'static str) -> Result<&'a Bytes, MetainfoError> {
    match required(dict, key)? {
        Value::Bytes(b) => Ok(b),
        other => Err(wrong_type(key, "byte string", other)),
    }
}

/// Collects diagnostics while fields are extracted.
#[derive(Default)]
struct Report {
    diagnostics: Vec<Diagnostic>,
}

impl Report {
    fn push(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    fn wrong_type(&mut self, field: &'static str, expected: &'static str, found: &Value) {
        self.push(Diagnostic::WrongType {
            field,
            expected,
            found: found.type_name(),
        });
    }

    /// A required byte string read as text. Invalid UTF-8 is replaced
    /// rather than rejected; a missing or mistyped field still fails.
    fn required_text(&mut self, dict: &Dict, key: &'static str) -> Result<String, MetainfoError> {
        let bytes = required_bytes(dict, key)?;
        match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_string()),
            Err(_) => {
                self.push(Diagnostic::LossyText { field: key });
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }

    fn optional_integer(&mut self, dict: &Dict, key: &'static str) -> Option<i64> {
        match lookup(dict, key)? {
            Value::Integer(i) => Some(*i),
            other => {
                self.wrong_type(key, "integer", other);
                None
            }
        }
    }

    fn optional_text(&mut self, dict: &Dict, key: &'static str) -> Option<String> {
        match lookup(dict, key)? {
            Value::Bytes(b) => match std::str::from_utf8(b) {
                Ok(s) => Some(s.to_string()),
                Err(_) => {
                    self.push(Diagnostic::InvalidText { field: key });
                    None
                }
            },
            other => {
                self.wrong_type(key, "byte string", other);
                None
            }
        }
    }

    /// Tiers that are not lists, and URLs that are not text, are skipped one
    /// by one; the rest of the list is kept.
    fn announce_list(&mut self, dict: &Dict) -> Option<Vec<Vec<String>>> {
        let tiers = match lookup(dict, KEY_ANNOUNCE_LIST)? {
            Value::List(l) => l,
            other => {
                self.wrong_type(KEY_ANNOUNCE_LIST, "list", other);
                return None;
            }
        };

        let mut parsed = Vec::with_capacity(tiers.len());
        for (tier_index, tier) in tiers.iter().enumerate() {
            let Some(urls) = tier.as_list() else {
                self.push(Diagnostic::SkippedTier {
                    tier: tier_index,
                    found: tier.type_name(),
                });
                continue;
            };

            let mut tier_urls = Vec::with_capacity(urls.len());
            for (index, url) in urls.iter().enumerate() {
                match url.as_str() {
                    Some(url) => tier_urls.push(url.to_string()),
                    None => self.push(Diagnostic::SkippedTracker {
                        tier: tier_index,
                        index,
                    }),
                }
            }

            if tier_urls.is_empty() {
                self.push(Diagnostic::EmptyTier { tier: tier_index });
            } else {
                parsed.push(tier_urls);
            }
        }

        Some(parsed)
    }
}
