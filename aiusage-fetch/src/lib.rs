// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # aiusage Fetch
//!
//! Data-source infrastructure for aiusage.
//!
//! ## Host APIs
//!
//! The [`host`] module provides abstractions for reading tool data:
//!
//! - [`host::files`] - Directory scans and modification times
//! - [`host::jsonl`] - Lazy line-delimited JSON reading
//! - [`host::sqlite`] - Read-only database snapshots
//! - [`host::http`] - HTTP client with tracing and domain allowlist
//!
//! ## Sources
//!
//! - [`strategy::UsageSource`] - Trait for one place usage data lives
//! - [`locator::SourceLocator`] - Where a source's data is, checked without reading
//! - [`pipeline::SourcePipeline`] - Reads all of a provider's sources and classifies the result
//! - [`context::FetchContext`] - Reference time, path roots, credentials, timeouts
//!
//! ## Example
//!
//! ```ignore
//! use aiusage_fetch::{FetchContext, SourcePipeline};
//!
//! let ctx = FetchContext::new()?;
//! let pipeline = SourcePipeline::with_sources(vec![Box::new(ClaudeProjects)]);
//! let report = pipeline.report(ProviderId::ClaudeCode, Capability::Tokens, &ctx).await;
//! ```

pub mod context;
pub mod error;
pub mod host;
pub mod locator;
pub mod pipeline;
pub mod strategy;

// Errors
pub use error::{FetchError, HttpError};

// Host APIs
pub use host::{HttpClient, JsonLines, SqliteSnapshot};

// Sources & Pipeline
pub use context::{Credential, FetchContext, FetchContextBuilder, FetchSettings, PathRoots};
pub use locator::{Resolution, SourceLocator};
pub use pipeline::{SourceOutcome, SourcePipeline};
pub use strategy::{SourceBatch, SourceKind, UsageSource, run_blocking};
