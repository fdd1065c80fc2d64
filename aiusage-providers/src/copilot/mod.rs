//! GitHub Copilot provider implementation.
//!
//! Copilot keeps no local usage records. The internal user endpoint reports
//! how many requests a limited (free) plan has used in its current period:
//!
//! ```json
//! {
//!   "copilot_plan": "individual",
//!   "limited_user_usage": 42,
//!   "limited_user_reset_date": "2025-07-01"
//! }
//! ```
//!
//! The counter has no per-request timestamps, so it only counts toward the
//! all-time window. Paid plans omit it.
//!
//! ## Credentials
//!
//! 1. `GITHUB_TOKEN` / `GH_TOKEN`
//! 2. `~/.config/github-copilot/hosts.json` (written by the editor plugins)
//! 3. `~/.config/gh/hosts.yml` (GitHub CLI)

mod api;
mod descriptor;
mod token_store;

pub use api::{CopilotApiSource, CopilotUserResponse};
pub use descriptor::copilot_descriptor;
pub use token_store::CopilotTokenStore;
