//! Claude Code provider implementation.
//!
//! Claude Code (CLI and IDE extensions) appends every conversation to a
//! JSON-lines transcript per session. Assistant turns carry the API usage
//! block:
//!
//! ```json
//! {
//!   "type": "assistant",
//!   "timestamp": "2025-06-04T10:15:00.000Z",
//!   "message": {
//!     "usage": {
//!       "input_tokens": 12,
//!       "output_tokens": 340,
//!       "cache_read_input_tokens": 20480,
//!       "cache_creation_input_tokens": 512
//!     }
//!   }
//! }
//! ```
//!
//! ## Data Locations
//!
//! - `~/.claude/projects/<project>/<session>.jsonl`
//! - `~/.config/claude/projects/...` (newer releases)

mod descriptor;
pub(crate) mod parser;

pub use descriptor::claude_descriptor;
