//! Fetch error types.
//!
//! Every failure a data source can hit is one of these variants. The
//! variant decides the provider's report status; the message becomes the
//! row's diagnostic.

use std::time::Duration;

use aiusage_core::ReportStatus;
use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for data-source operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The tool is not installed or its data is absent.
    #[error("source not found: {0}")]
    SourceNotFound(String),

    /// The data exists but cannot be decoded (encrypted or proprietary).
    #[error("{0}")]
    SourceUnreadable(String),

    /// The tool has no local or API usage data, only a web page.
    #[error("usage only available at {0}")]
    NotApplicable(String),

    /// A single record could not be parsed.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// No credential was supplied for a remote source.
    #[error("credential not set ({0})")]
    CredentialMissing(String),

    /// The remote source rejected the credential.
    #[error("authentication failed: {0}")]
    AuthFailure(String),

    /// The remote source could not be reached.
    #[error("network error: {0}")]
    NetworkFailure(String),

    /// Rate limited by the remote source.
    #[error("rate limited{}", .retry_after.map(|s| format!(", retry after {s}s")).unwrap_or_default())]
    RateLimited {
        /// Seconds the server asked us to wait.
        retry_after: Option<u64>,
    },

    /// The operation did not finish in time.
    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The remote source answered with something we could not interpret.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Other HTTP error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// SQLite error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Core error.
    #[error("core error: {0}")]
    Core(#[from] aiusage_core::CoreError),

    /// Unexpected defect (panic, join failure).
    #[error("internal fault: {0}")]
    InternalFault(String),
}

impl FetchError {
    /// Maps this error onto the report status it produces.
    pub fn status(&self) -> ReportStatus {
        match self {
            Self::SourceNotFound(_) | Self::SourceUnreadable(_) | Self::CredentialMissing(_) => {
                ReportStatus::Unavailable
            }
            Self::NotApplicable(_) => ReportStatus::NotApplicable,
            _ => ReportStatus::Error,
        }
    }

    /// Returns true for the "tool not installed" case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SourceNotFound(_))
    }

    /// Returns true if this is a missing table/column rather than a real failure.
    pub fn is_schema_gap(&self) -> bool {
        match self {
            Self::Database(e) => {
                let msg = e.to_string();
                msg.contains("no such table") || msg.contains("no such column")
            }
            _ => false,
        }
    }

    /// Severity used to choose which error describes a provider with no
    /// successful source. Higher wins.
    pub fn severity(&self) -> u8 {
        match self.status() {
            ReportStatus::Error => 3,
            ReportStatus::Unavailable if !self.is_not_found() => 2,
            ReportStatus::NotApplicable => 1,
            _ => 0,
        }
    }
}

// ============================================================================
// HTTP Error
// ============================================================================

/// HTTP-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Domain not allowed.
    #[error("domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Invalid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

// ============================================================================
// Tests
// ============================================================================
