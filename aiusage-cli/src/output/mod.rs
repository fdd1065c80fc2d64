//! Output formatting for CLI.

mod csv;
mod json;
mod text;

use std::io::IsTerminal;

pub use csv::CsvFormatter;
pub use json::JsonFormatter;
pub use text::TextFormatter;

/// True when stdout is a terminal and `NO_COLOR` is unset.
pub fn use_colors() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}
