//! Sourcegraph Cody provider implementation.
//!
//! Cody keeps chat history as JSON files in its VS Code `globalStorage`.
//! Each file lists messages; assistant messages count as requests. Token
//! counts are only present when the file carries a `tokenCount` block.

mod descriptor;
pub(crate) mod parser;

pub use descriptor::cody_descriptor;
