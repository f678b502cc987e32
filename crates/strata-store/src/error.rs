//! Error types for strata-store

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the record store and the operative index
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record file under that name
    #[error("record not found: {0}")]
    NotFound(String),

    /// File exists but cannot be decoded
    #[error("malformed data in {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    /// Underlying filesystem failure
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Refusing to overwrite an existing record
    #[error("record already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// Reference is not a `memory_{level}_{id}.json` filename
    #[error("invalid record reference: {0}")]
    InvalidReference(String),

    /// Serialization of an outgoing document failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Malformed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
