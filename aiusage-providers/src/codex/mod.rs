//! OpenAI Codex provider implementation.
//!
//! Codex usage is billed to the OpenAI organization, so it is read from the
//! organization usage API with an API key from `OPENAI_API_KEY` or
//! `OPENAI_KEY`. The endpoint returns one bucket per aggregation period:
//!
//! ```json
//! {"data": [{"aggregation_timestamp": 1749027600, "n_requests": 3,
//!            "n_context_tokens_total": 300, "n_generated_tokens_total": 150}]}
//! ```
//!
//! Only the current month is requested, so `total` equals `this_month`.

mod api;
mod descriptor;

pub use api::{CodexUsageSource, OpenAiUsageResponse, UsageBucket};
pub use descriptor::codex_descriptor;
