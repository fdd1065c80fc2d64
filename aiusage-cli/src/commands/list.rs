//! List command - show supported tools.

use aiusage_providers::ProviderRegistry;
use anyhow::Result;

use crate::ExitCode;
use crate::output::{TextFormatter, use_colors};

/// Runs the list command.
pub fn run() -> Result<ExitCode> {
    let formatter = TextFormatter::new(use_colors());
    println!("{}", formatter.format_providers(ProviderRegistry::all()));
    Ok(ExitCode::Success)
}
