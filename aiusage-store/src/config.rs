//! Configuration management.
//!
//! The config file is optional. A missing file means defaults; a file that
//! exists but does not parse, or names a provider that does not exist, is
//! a fatal error rather than something to silently ignore.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use aiusage_core::ProviderId;
use aiusage_fetch::context::{DEFAULT_REMOTE_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};
use aiusage_fetch::{FetchSettings, PathRoots};
use aiusage_providers::ProviderRegistry;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::persistence::{default_config_path, load_json, save_json};

// ============================================================================
// Config
// ============================================================================

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Timeout for local providers, in seconds.
    pub default_timeout_secs: u64,
    /// Timeout for providers that call an HTTP API, in seconds.
    pub remote_timeout_secs: u64,
    /// Per-provider timeouts keyed by CLI name.
    pub provider_timeouts: BTreeMap<String, u64>,
    /// Providers to skip entirely.
    pub disabled_providers: Vec<String>,
    /// Extra credential variable per provider, consulted first.
    pub credential_env: BTreeMap<String, String>,
    /// Replacement filesystem roots.
    pub path_overrides: PathOverrides,
}

/// Overrides for the directories tool paths are resolved against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathOverrides {
    /// Home directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<PathBuf>,
    /// Platform config directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<PathBuf>,
    /// Platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
            remote_timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
            provider_timeouts: BTreeMap::new(),
            disabled_providers: Vec::new(),
            credential_env: BTreeMap::new(),
            path_overrides: PathOverrides::default(),
        }
    }
}

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> Result<PathBuf, StoreError> {
        default_config_path()
    }

    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, StoreError> {
        Self::load_from(&Self::default_path()?)
    }

    /// Loads and validates configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        let Some(config) = load_json::<Self>(path)? else {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        };

        config.validate()?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Writes the default configuration.
    ///
    /// Refuses to replace an existing file unless `force` is set.
    pub async fn init(path: &Path, force: bool) -> Result<(), StoreError> {
        if path.exists() && !force {
            return Err(StoreError::AlreadyExists(path.to_path_buf()));
        }
        save_json(path, &Self::default()).await?;
        info!(path = %path.display(), "Wrote default configuration");
        Ok(())
    }

    /// Checks values that serde cannot.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.default_timeout_secs == 0 || self.remote_timeout_secs == 0 {
            return Err(StoreError::Config("timeouts must be at least 1 second".into()));
        }
        for (name, secs) in &self.provider_timeouts {
            resolve_provider(name)?;
            if *secs == 0 {
                return Err(StoreError::Config(format!(
                    "timeout for {name} must be at least 1 second"
                )));
            }
        }
        for name in self.disabled_providers.iter().chain(self.credential_env.keys()) {
            resolve_provider(name)?;
        }
        Ok(())
    }

    /// Converts to engine settings.
    pub fn fetch_settings(&self) -> Result<FetchSettings, StoreError> {
        let mut settings = FetchSettings {
            default_timeout: Duration::from_secs(self.default_timeout_secs),
            remote_timeout: Duration::from_secs(self.remote_timeout_secs),
            ..FetchSettings::default()
        };
        for (name, secs) in &self.provider_timeouts {
            settings
                .provider_timeouts
                .insert(resolve_provider(name)?, Duration::from_secs(*secs));
        }
        for name in &self.disabled_providers {
            settings.disabled.insert(resolve_provider(name)?);
        }
        for (name, var) in &self.credential_env {
            settings.credential_env.insert(resolve_provider(name)?, var.clone());
        }
        Ok(settings)
    }

    /// Resolves filesystem roots, applying overrides.
    ///
    /// Returns `None` when no home directory can be found and none is
    /// configured.
    pub fn path_roots(&self) -> Option<PathRoots> {
        let overrides = &self.path_overrides;
        let mut roots = match &overrides.home {
            Some(home) => PathRoots::under(home),
            None => PathRoots::detect()?,
        };
        if let Some(config) = &overrides.config {
            roots.config.clone_from(config);
        }
        if let Some(data) = &overrides.data {
            roots.data.clone_from(data);
        }
        Some(roots)
    }
}

/// Maps a CLI name or alias to a provider.
fn resolve_provider(name: &str) -> Result<ProviderId, StoreError> {
    ProviderRegistry::get_by_cli_name(name)
        .map(|d| d.id)
        .ok_or_else(|| StoreError::UnknownProvider(name.to_string()))
}

// ============================================================================
// Tests
// ============================================================================
