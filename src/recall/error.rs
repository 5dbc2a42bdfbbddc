//! Error types for the associative-recall layer.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the recall layer.
///
/// A corrupted co-visitation document is not an error: it is logged and
/// replaced by an empty graph.
#[derive(Error, Debug)]
pub enum RecallError {
    /// Reading or writing the co-visitation document failed.
    #[error("co-visitation storage error at {}: {source}", path.display())]
    Storage {
        /// File the operation was acting on.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The graph could not be encoded as JSON.
    #[error("failed to serialize co-visitation index: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Another thread panicked while holding the recorder lock.
    #[error("recall state lock poisoned")]
    LockPoisoned,
}

impl RecallError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, RecallError>;
