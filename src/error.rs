//! Error types for configuration loading.
//!
//! The simulation itself has no failure modes: bad canvas sizes and
//! out-of-place inputs are absorbed as no-ops. Only the config layer can fail.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or validating a [`crate::GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid JSON for [`crate::GameConfig`].
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Unknown variant name.
    #[error("Unknown variant: {0} (expected dino or spaceship)")]
    UnknownVariant(String),

    /// A value is out of its allowed range.
    #[error("Invalid config value for {field}: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
