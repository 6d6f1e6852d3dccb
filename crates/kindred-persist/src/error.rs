//! Error types for the persistence layer.

use std::path::PathBuf;

/// Errors raised while encoding, decoding, reading, or writing documents.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The payload is JSON but not a family-tree document.
    #[error("invalid family tree document: {reason}")]
    Format {
        /// What was wrong with the payload.
        reason: String,
    },

    /// The payload is not valid JSON, or a record could not be encoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a blob failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file being read or written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl PersistError {
    pub(crate) fn format(reason: impl Into<String>) -> Self {
        Self::Format {
            reason: reason.into(),
        }
    }
}
