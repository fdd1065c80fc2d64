//! Usage source trait and types.
//!
//! A source is one place a provider's usage lives: a log directory, a
//! database, an API endpoint. Providers can have several sources (Cline
//! and its Roo fork, Windsurf logs and its encrypted store) that are all
//! read and merged by the [`crate::pipeline::SourcePipeline`].

use std::fmt;

use aiusage_core::{Aggregator, PeriodBounds, UsageWindows};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::context::FetchContext;
use crate::error::FetchError;
use crate::locator::SourceLocator;

// ============================================================================
// Source Kind
// ============================================================================

/// The storage technology a source reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Line-delimited logs or per-session JSON files.
    LogFiles,
    /// Embedded relational database.
    Database,
    /// Proprietary or encrypted files.
    EncryptedBlob,
    /// Remote HTTP API.
    RemoteApi,
    /// Web dashboard link only.
    Link,
}

impl SourceKind {
    /// Returns the display name for this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::LogFiles => "Log Files",
            Self::Database => "Database",
            Self::EncryptedBlob => "Encrypted",
            Self::RemoteApi => "Remote API",
            Self::Link => "Link",
        }
    }

    /// Returns true for sources that may block on the network.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteApi)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ============================================================================
// Source Batch
// ============================================================================

/// What one successful source read produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceBatch {
    /// Where the data came from.
    pub location: String,
    /// Bucketed usage.
    pub windows: UsageWindows,
    /// Number of canonical events.
    pub events: u64,
    /// Records skipped as malformed or lacking required fields.
    pub skipped: u64,
    /// Notes about degraded reading (schema gaps and similar).
    pub notes: Vec<String>,
}

impl SourceBatch {
    /// Finishes an aggregator into a batch.
    pub fn from_aggregator(location: impl Into<String>, aggregator: Aggregator) -> Self {
        Self {
            location: location.into(),
            events: aggregator.event_count(),
            windows: aggregator.finish(),
            skipped: 0,
            notes: Vec::new(),
        }
    }

    /// Creates an empty batch (source read, no usage).
    pub fn empty(location: impl Into<String>, bounds: PeriodBounds) -> Self {
        Self::from_aggregator(location, Aggregator::new(bounds))
    }

    /// Sets the skipped count.
    #[must_use]
    pub fn with_skipped(mut self, skipped: u64) -> Self {
        self.skipped = skipped;
        self
    }

    /// Adds a note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

// ============================================================================
// Usage Source Trait
// ============================================================================

/// One readable location of a provider's usage data.
///
/// ## Implementing a Source
///
/// ```ignore
/// struct ClaudeProjects;
///
/// #[async_trait]
/// impl UsageSource for ClaudeProjects {
///     fn id(&self) -> &str {
///         "claude-code.projects"
///     }
///
///     fn kind(&self) -> SourceKind {
///         SourceKind::LogFiles
///     }
///
///     fn locate(&self, ctx: &FetchContext) -> SourceLocator {
///         SourceLocator::Directory(ctx.roots.home_path(".claude/projects"))
///     }
///
///     async fn read(&self, ctx: &FetchContext) -> Result<SourceBatch, FetchError> {
///         // Scan files, turn records into events, bucket them.
///     }
/// }
/// ```
#[async_trait]
pub trait UsageSource: Send + Sync {
    /// Unique identifier (`{provider}.{source}`).
    fn id(&self) -> &str;

    /// The storage technology this source reads.
    fn kind(&self) -> SourceKind;

    /// Where the data lives. Must not touch the filesystem beyond path math.
    fn locate(&self, ctx: &FetchContext) -> SourceLocator;

    /// Reads the data and buckets it into windows.
    ///
    /// Returns `SourceNotFound` when the locator resolves to nothing.
    async fn read(&self, ctx: &FetchContext) -> Result<SourceBatch, FetchError>;
}

/// Runs blocking parser work off the async runtime.
///
/// A panic inside `f` becomes [`FetchError::InternalFault`].
pub async fn run_blocking<F, T>(f: F) -> Result<T, FetchError>
where
    F: FnOnce() -> Result<T, FetchError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| FetchError::InternalFault(format!("parser task failed: {e}")))?
}

// ============================================================================
// Tests
// ============================================================================
