//! Gemini Code Assist provider implementation.
//!
//! The extension keeps its state in VS Code `globalStorage`, in a format
//! that does not expose usage. An installed extension is reported as
//! unavailable with a pointer to the Google Cloud console.

mod descriptor;

pub use descriptor::gemini_code_assist_descriptor;
