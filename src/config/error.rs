//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("invalid value '{value}' for {name}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A setting that must be at least 1 was zero.
    #[error("{name} must be greater than zero")]
    MustBePositive { name: &'static str },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },
}
