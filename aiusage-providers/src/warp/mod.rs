//! Warp provider implementation.
//!
//! Warp keeps agent conversations in `warp.sqlite`. Each row of
//! `agent_conversations` carries a JSON blob whose
//! `conversation_usage_metadata.token_usage` lists per-model token totals.
//! Warp does not split input from output, so this provider reports totals
//! only. Databases from before agent mode only have `ai_queries`, which
//! yields request counts.

mod descriptor;
pub(crate) mod parser;

pub use descriptor::warp_descriptor;
