//! Tabnine provider implementation.
//!
//! Tabnine's local engine logs completion events to its `logs` directory,
//! interleaved with plain diagnostic text. Only the generated side of a
//! completion is counted; Tabnine does not log prompt sizes.

mod descriptor;
pub(crate) mod parser;

pub use descriptor::tabnine_descriptor;
