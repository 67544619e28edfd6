//! Domain errors for record parsing, sentence validation and dictionary loading.

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Structural failures. Each one fails the current record only.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A delimited field could not be decoded.
    #[error("malformed record field `{field}`: {reason}")]
    MalformedRecord { field: &'static str, reason: String },

    /// Per-token columns disagree on the number of tokens.
    #[error("field `{field}` has {found} values, expected {expected}")]
    FieldLengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    /// A dependency parent points outside the sentence.
    #[error("token {token} has dependency parent {parent} outside a sentence of {len} tokens")]
    ParentOutOfRange {
        token: usize,
        parent: usize,
        len: usize,
    },

    /// Following parent links from a token never reaches a root.
    #[error("dependency parents starting at token {token} form a cycle")]
    DependencyCycle { token: usize },

    /// A position was requested that the sentence does not have.
    #[error("token position {position} out of range for {len} tokens")]
    TokenOutOfRange { position: usize, len: usize },

    /// A mention was requested over zero tokens.
    #[error("a mention must span at least one token")]
    EmptySpan,

    /// A dictionary file is missing or unreadable.
    #[error("dictionary `{name}`: {reason}")]
    Dictionary { name: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a malformed-field error.
    pub fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Error::MalformedRecord {
            field,
            reason: reason.into(),
        }
    }

    /// Create a dictionary loading error.
    pub fn dictionary(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Dictionary {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
