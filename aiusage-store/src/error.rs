//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or writing configuration.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The config file exists but could not be parsed.
    #[error("invalid config file {path}: {source}")]
    InvalidConfig {
        /// Config file path.
        path: PathBuf,
        /// Parse failure.
        source: serde_json::Error,
    },

    /// A provider name in the config matches no provider.
    #[error("unknown provider in config: {0}")]
    UnknownProvider(String),

    /// A config value is out of range.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Refusing to overwrite an existing file.
    #[error("file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// No config directory for this platform.
    #[error("cannot determine the config directory")]
    NoConfigDir,
}

impl StoreError {
    /// Returns true if the error came from the file's contents rather than
    /// the filesystem.
    pub fn is_invalid_config(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidConfig { .. } | StoreError::UnknownProvider(_) | StoreError::Config(_)
        )
    }
}
