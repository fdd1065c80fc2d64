//! Parser families, one per storage technology.
//!
//! - [`logs`] - Line-delimited logs and per-session JSON files
//! - [`database`] - Embedded SQLite databases
//! - [`blob`] - Encrypted or proprietary stores (detected, never parsed)
//! - [`remote`] - Authenticated HTTP usage endpoints
//! - [`link`] - Web dashboards only

pub mod blob;
pub mod database;
pub mod link;
pub mod logs;
pub mod remote;

pub use blob::EncryptedSource;
pub use database::DatabaseSource;
pub use link::LinkSource;
pub use logs::{EventSink, FileMeta, LogFormat, LogSource, LogTarget, Record};
