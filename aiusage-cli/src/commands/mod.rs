//! CLI command implementations.

pub mod config;
pub mod doctor;
pub mod list;
pub mod usage;

use std::sync::Arc;

use aiusage_fetch::FetchContext;
use aiusage_store::Config;
use anyhow::{Context, Result};
use tracing::debug;

/// Loads the config and builds the fetch context for one invocation.
///
/// An invalid config file is fatal.
pub fn build_context() -> Result<Arc<FetchContext>> {
    let path = Config::default_path()?;
    let config = Config::load_from(&path)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    context_from(&config)
}

/// Builds the fetch context from an already loaded config.
pub fn context_from(config: &Config) -> Result<Arc<FetchContext>> {
    let roots = config
        .path_roots()
        .context("cannot determine the home directory; set path_overrides.home in the config")?;
    debug!(home = %roots.home.display(), "Resolved path roots");

    let ctx = FetchContext::builder()
        .roots(roots)
        .settings(config.fetch_settings()?)
        .build()?;
    Ok(Arc::new(ctx))
}
