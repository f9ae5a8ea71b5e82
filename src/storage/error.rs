use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by preference stores.
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Record carries a version this build cannot read.
    #[error("unsupported record version {found} in {}", path.display())]
    UnsupportedVersion {
        /// Record file.
        path: PathBuf,
        /// Version found in the record.
        found: u32,
    },

    /// Record belongs to a different user than its location implies.
    #[error("record {} belongs to another user ({found})", path.display())]
    ForeignRecord {
        /// Record file.
        path: PathBuf,
        /// User id found in the record.
        found: String,
    },

    /// Storage root path is missing/unavailable.
    #[error("storage path unavailable: {}", path.display())]
    StorageUnavailable {
        /// Path that was unavailable.
        path: PathBuf,
    },

    /// Write rejected (used by test stores to simulate failures).
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// Blocking storage task panicked or was cancelled.
    #[error("storage task failed: {0}")]
    TaskFailed(String),
}

impl StorageError {
    /// Whether retrying the same operation later may succeed.
    ///
    /// Unreadable, foreign and newer-version records are not transient.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Io(_)
            | Self::StorageUnavailable { .. }
            | Self::WriteFailed(_)
            | Self::TaskFailed(_) => true,
            Self::Serialization(e) => e.is_io(),
            Self::UnsupportedVersion { .. } | Self::ForeignRecord { .. } => false,
        }
    }
}

/// Convenience result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
