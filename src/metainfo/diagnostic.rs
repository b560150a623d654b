use std::fmt;

/// A problem with an optional field that was skipped during parsing.
///
/// Many real-world torrents omit or mangle informational fields, so these
/// never fail a parse. Each one is logged at `warn` level and kept on the
/// resulting [`Metainfo`](super::Metainfo).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The field is present but has the wrong bencode type; it was left unset.
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    /// The field is a byte string that is not valid UTF-8; it was left unset.
    InvalidText { field: &'static str },
    /// A required text field is not valid UTF-8; invalid sequences were
    /// replaced with U+FFFD and the field was kept.
    LossyText { field: &'static str },
    /// An `announce-list` tier is not a list and was skipped.
    SkippedTier { tier: usize, found: &'static str },
    /// An `announce-list` URL is not a text byte string and was skipped.
    SkippedTracker { tier: usize, index: usize },
    /// An `announce-list` tier held no usable URLs and was dropped.
    EmptyTier { tier: usize },
}

impl Diagnostic {
    /// The key of the field the diagnostic refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Diagnostic::WrongType { field, .. }
            | Diagnostic::InvalidText { field }
            | Diagnostic::LossyText { field } => *field,
            Diagnostic::SkippedTier { .. }
            | Diagnostic::SkippedTracker { .. }
            | Diagnostic::EmptyTier { .. } => crate::constants::KEY_ANNOUNCE_LIST,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::WrongType {
                field,
                expected,
                found,
            } => write!(f, "ignoring {field}: expected {expected}, got {found}"),
            Diagnostic::InvalidText { field } => {
                write!(f, "ignoring {field}: not valid utf-8")
            }
            Diagnostic::LossyText { field } => {
                write!(f, "{field} is not valid utf-8, replaced invalid bytes")
            }
            Diagnostic::SkippedTier { tier, found } => {
                write!(f, "skipping announce-list tier {tier}: expected list, got {found}")
            }
            Diagnostic::SkippedTracker { tier, index } => {
                write!(f, "skipping announce-list tier {tier} entry {index}: not a text url")
            }
            Diagnostic::EmptyTier { tier } => {
                write!(f, "dropping empty announce-list tier {tier}")
            }
        }
    }
}
