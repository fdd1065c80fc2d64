//! Windsurf provider implementation.
//!
//! Windsurf writes Cascade activity to `~/.codeium/windsurf/cascade`. Older
//! builds kept plain JSON lines there; current builds store each conversation
//! as an encrypted `.pb` file. When only `.pb` files are left the provider
//! reports why it cannot read them instead of showing zero usage.

mod descriptor;
pub(crate) mod parser;

pub use descriptor::windsurf_descriptor;
