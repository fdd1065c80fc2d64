//! OpenCode provider implementation.
//!
//! OpenCode stores one JSON file per message under
//! `~/.local/share/opencode/storage/message/<session>/`. Assistant messages
//! carry a `tokens` block and a `time.created` epoch in milliseconds.
//! Older builds wrote whole sessions with a `usage` summary and a
//! `messages` array instead; both layouts are read.

mod descriptor;
pub(crate) mod parser;

pub use descriptor::opencode_descriptor;
