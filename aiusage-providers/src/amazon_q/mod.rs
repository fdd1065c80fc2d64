//! Amazon Q Developer provider implementation.
//!
//! The Q CLI writes `~/.aws/q/q_developer_log.txt`. Depending on the version
//! lines are JSON objects or plain text such as:
//!
//! ```text
//! 2025-06-04 09:00:00 INFO chat response input_tokens=300 output_tokens=150
//! ```

mod descriptor;
pub(crate) mod parser;

pub use descriptor::amazon_q_descriptor;
