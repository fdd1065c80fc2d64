//! Gemini CLI provider implementation.
//!
//! The CLI saves each chat under `~/.gemini/tmp/<project-hash>/chats/` as a
//! `session-*.json` file whose model turns carry token counts:
//!
//! ```json
//! {"sessionId": "…", "messages": [
//!   {"type": "gemini", "timestamp": "2025-06-04T09:00:00Z",
//!    "tokens": {"input": 300, "output": 150, "cached": 0, "total": 450}}]}
//! ```
//!
//! With telemetry enabled it also writes `~/.gemini/telemetry.log`. Newer
//! builds keep conversations as encrypted `.pb` files, which are only
//! detected.

mod descriptor;
pub(crate) mod parser;

pub use descriptor::gemini_descriptor;
