// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # aiusage Providers
//!
//! Tool bindings for aiusage: where each AI coding tool keeps its usage
//! data and how to read it, plus the engine that runs them all.
//!
//! Each provider module includes:
//!
//! - **Descriptor**: Static configuration (metadata, capability, sources)
//! - **Parser**: Record mapping for the tool's on-disk or wire format
//!
//! Parsing is shared through the [`formats`] families, so a provider only
//! names its paths and maps its fields.
//!
//! ## Supported Providers (14 total)
//!
//! | Provider | Storage | Measures |
//! |----------|---------|----------|
//! | Claude Code | JSONL transcripts | tokens |
//! | Cursor | SQLite | tokens |
//! | GitHub Copilot | HTTP API | requests |
//! | Cline / Roo Code | JSON task files | tokens |
//! | Windsurf | JSONL / JSON logs | tokens |
//! | Warp | SQLite | total tokens |
//! | OpenCode | JSON message files | tokens |
//! | OpenAI Codex | HTTP API | tokens |
//! | Gemini CLI | JSON sessions, telemetry log | tokens |
//! | Amazon Q | Text log | tokens |
//! | Tabnine | JSON line logs | tokens |
//! | Gemini Code Assist | Encrypted | tokens |
//! | Sourcegraph Cody | JSON history | requests |
//! | Replit | Dashboard only | link |
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use aiusage_fetch::FetchContext;
//! use aiusage_providers::UsageEngine;
//!
//! let ctx = Arc::new(FetchContext::new()?);
//! let report = UsageEngine::new().run(&ctx).await;
//! ```

pub mod descriptor;
pub mod doctor;
pub mod engine;
pub mod formats;
pub mod paths;
pub mod registry;

// Provider modules (alphabetical)
pub mod amazon_q;
pub mod claude;
pub mod cline;
pub mod codex;
pub mod cody;
pub mod copilot;
pub mod cursor;
pub mod gemini;
pub mod gemini_code_assist;
pub mod opencode;
pub mod replit;
pub mod tabnine;
pub mod warp;
pub mod windsurf;

// Re-export key types
pub use descriptor::{ProviderDescriptor, ProviderDescriptorBuilder, ProviderMetadata};
pub use doctor::{Doctor, DoctorReport, ProviderCheck, SourceCheck};
pub use engine::UsageEngine;
pub use registry::ProviderRegistry;

// Re-export provider descriptors
pub use amazon_q::amazon_q_descriptor;
pub use claude::claude_descriptor;
pub use cline::cline_descriptor;
pub use codex::codex_descriptor;
pub use cody::cody_descriptor;
pub use copilot::copilot_descriptor;
pub use cursor::cursor_descriptor;
pub use gemini::gemini_descriptor;
pub use gemini_code_assist::gemini_code_assist_descriptor;
pub use opencode::opencode_descriptor;
pub use replit::replit_descriptor;
pub use tabnine::tabnine_descriptor;
pub use warp::warp_descriptor;
pub use windsurf::windsurf_descriptor;

#[cfg(test)]
mod engine_tests;
