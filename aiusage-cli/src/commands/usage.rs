//! Usage command - run every provider and render the report.

use aiusage_providers::{ProviderDescriptor, ProviderRegistry, UsageEngine};
use anyhow::Result;
use clap::Args;
use tracing::info;

use super::build_context;
use crate::output::{CsvFormatter, JsonFormatter, TextFormatter, use_colors};
use crate::{Cli, ExitCode, OutputFormat};

/// Arguments for the usage command.
#[derive(Args, Default)]
pub struct UsageArgs {
    /// Tool(s) to query, by CLI name or alias. Comma-separated or repeated.
    #[arg(long, short, value_delimiter = ',')]
    pub tool: Vec<String>,

    /// Output format.
    #[arg(long, short, value_enum, default_value_t)]
    pub format: OutputFormat,
}

/// Runs the usage command.
pub async fn run(args: &UsageArgs, cli: &Cli) -> Result<ExitCode> {
    anyhow::ensure!(ProviderRegistry::count() > 0, "no providers are registered");

    let providers = match select_providers(&args.tool) {
        Ok(providers) => providers,
        Err(name) => {
            eprintln!("Unknown tool: {name}. Run `aiusage list` for supported tools.");
            return Ok(ExitCode::BadArguments);
        }
    };

    let ctx = build_context()?;
    info!(providers = providers.len(), "Fetching usage");
    let report = UsageEngine::with_providers(providers).run(&ctx).await;

    let output = match args.format {
        OutputFormat::Table => {
            TextFormatter::new(use_colors()).format_report(&report, cli.verbose)
        }
        OutputFormat::Json => JsonFormatter::new(cli.pretty).format_report(&report)?,
        OutputFormat::Csv => CsvFormatter::format_report(&report),
    };
    println!("{output}");

    Ok(ExitCode::Success)
}

/// Resolves `--tool` names; an empty list selects every provider.
///
/// Returns the first name that matches nothing.
fn select_providers(names: &[String]) -> Result<Vec<&'static ProviderDescriptor>, String> {
    if names.is_empty() {
        return Ok(ProviderRegistry::all().iter().collect());
    }

    let mut selected: Vec<&'static ProviderDescriptor> = Vec::new();
    for name in names.iter().filter(|n| !n.trim().is_empty()) {
        let desc = ProviderRegistry::get_by_cli_name(name).ok_or_else(|| name.clone())?;
        if !selected.iter().any(|d| d.id == desc.id) {
            selected.push(desc);
        }
    }
    if selected.is_empty() {
        return Err(names.join(","));
    }
    Ok(selected)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use aiusage_core::ProviderId;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_no_filter_selects_all() {
        assert_eq!(select_providers(&[]).unwrap().len(), 14);
    }

    #[test]
    fn test_aliases_and_duplicates() {
        let selected = select_providers(&names(&["codex", "openai-codex", "Claude"])).unwrap();
        let ids: Vec<ProviderId> = selected.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![ProviderId::OpenaiCodex, ProviderId::ClaudeCode]);
    }

    #[test]
    fn test_unknown_tool_is_reported() {
        let err = select_providers(&names(&["cursor", "chatgpt"])).unwrap_err();
        assert_eq!(err, "chatgpt");
    }
}
