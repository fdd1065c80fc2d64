//! Core error types for `aiusage`.

use thiserror::Error;

/// Core error type for `aiusage` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No provider is registered under the given name.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// A calendar boundary could not be represented in the given timezone.
    #[error("Invalid time boundary: {0}")]
    InvalidBoundary(String),
}
