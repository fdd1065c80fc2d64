//! Host APIs for data sources.
//!
//! - [`files`] - Directory scans and modification times
//! - [`jsonl`] - Lazy line-delimited JSON reading and field access
//! - [`sqlite`] - Read-only database snapshots
//! - [`http`] - HTTP client with tracing and domain allowlist

pub mod files;
pub mod http;
pub mod jsonl;
pub mod sqlite;

pub use http::HttpClient;
pub use jsonl::JsonLines;
pub use sqlite::SqliteSnapshot;
