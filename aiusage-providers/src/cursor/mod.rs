//! Cursor IDE provider implementation.
//!
//! Cursor stores chat and composer state in VS Code-style SQLite databases
//! (`state.vscdb`). Token counts live in the `cursorDiskKV` table:
//!
//! - `composerData:<id>` - composer sessions with `tokenCount` and `createdAt`
//! - `bubbleId:<composer>:<id>` - individual responses with `tokenCount`
//!
//! Older builds only keep chat history in `ItemTable`, which yields request
//! counts without tokens or timestamps.
//!
//! ## Data Locations
//!
//! - `<config>/Cursor/User/globalStorage/state.vscdb`
//! - `<config>/Cursor/User/workspaceStorage/<hash>/state.vscdb` (10 most recent)

mod descriptor;
pub(crate) mod parser;

pub use descriptor::cursor_descriptor;
