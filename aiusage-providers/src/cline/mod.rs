//! Cline provider implementation (including the Roo Code fork).
//!
//! Both extensions keep one directory per task under their VS Code
//! `globalStorage`. Per-request usage is in `ui_messages.json`, where every
//! `api_req_started` message carries a JSON payload:
//!
//! ```json
//! {"ts": 1749031200000, "type": "say", "say": "api_req_started",
//!  "text": "{\"tokensIn\":120,\"tokensOut\":48,\"cacheReads\":0,\"cacheWrites\":900}"}
//! ```
//!
//! Older tasks only have a `task.json` summary with the same counters.
//! Roo Code also keeps lifetime totals in `~/.roo/usage-tracking.json`,
//! read only when its task history is gone.

mod descriptor;
pub(crate) mod parser;

pub use descriptor::cline_descriptor;
