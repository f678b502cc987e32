use std::path::PathBuf;
use strata_store::StoreError;
use thiserror::Error;

/// Errors surfaced by memory operations
#[derive(Debug, Error)]
pub enum MemoryError {
    /// The memory directory cannot be created or opened
    #[error("cannot initialize memory directory {}: {source}", .path.display())]
    Init {
        path: PathBuf,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MemoryError>;
