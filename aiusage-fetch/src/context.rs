//! Fetch context shared by every data source.
//!
//! The context bundles everything a source needs to find and read its
//! data: the reference "now" (as period bounds), the filesystem roots the
//! tool paths are resolved against, a snapshot of the environment for
//! credentials, and per-provider timeouts.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use aiusage_core::{PeriodBounds, ProviderId};
use chrono::{DateTime, Utc};

use crate::error::FetchError;
use crate::host::http::HttpClient;

/// Default timeout for local sources.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default timeout for remote API sources.
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 15;

// ============================================================================
// Path Roots
// ============================================================================

/// Base directories that tool data paths are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRoots {
    /// User home directory.
    pub home: PathBuf,
    /// Platform config directory (`~/.config`, `~/Library/Application Support`, `%APPDATA%`).
    pub config: PathBuf,
    /// Platform data directory (`~/.local/share`, `~/Library/Application Support`, `%APPDATA%`).
    pub data: PathBuf,
}

impl PathRoots {
    /// Detects the roots for the current user.
    pub fn detect() -> Option<Self> {
        let home = dirs::home_dir()?;
        let config = dirs::config_dir().unwrap_or_else(|| home.join(".config"));
        let data = dirs::data_dir().unwrap_or_else(|| home.join(".local/share"));
        Some(Self { home, config, data })
    }

    /// Roots laid out Linux-style under a single home directory.
    pub fn under(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            config: home.join(".config"),
            data: home.join(".local/share"),
            home,
        }
    }

    /// Joins a path relative to the home directory.
    pub fn home_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.home.join(relative)
    }

    /// Joins a path relative to the config directory.
    pub fn config_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.config.join(relative)
    }

    /// Joins a path relative to the data directory.
    pub fn data_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.data.join(relative)
    }

    /// VS Code's `globalStorage` directory, where extensions keep state.
    pub fn vscode_global_storage(&self) -> PathBuf {
        if cfg!(target_os = "linux") {
            self.config_path("Code/User/globalStorage")
        } else {
            self.data_path("Code/User/globalStorage")
        }
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// A resolved credential and where it came from.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Where the value was found (environment variable name or file path).
    pub origin: String,
    /// The secret itself.
    pub value: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("origin", &self.origin)
            .field("value", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for fetch operations.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Timeout for local sources.
    pub default_timeout: Duration,
    /// Timeout for remote API sources.
    pub remote_timeout: Duration,
    /// Per-provider overrides.
    pub provider_timeouts: HashMap<ProviderId, Duration>,
    /// Providers that are skipped entirely.
    pub disabled: HashSet<ProviderId>,
    /// Environment variable names consulted before a provider's built-in list.
    pub credential_env: HashMap<ProviderId, String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            remote_timeout: Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS),
            provider_timeouts: HashMap::new(),
            disabled: HashSet::new(),
            credential_env: HashMap::new(),
        }
    }
}

impl FetchSettings {
    /// Creates settings with a custom local timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Sets the timeout for one provider.
    #[must_use]
    pub fn with_provider_timeout(mut self, id: ProviderId, timeout: Duration) -> Self {
        self.provider_timeouts.insert(id, timeout);
        self
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Context provided to every data source.
pub struct FetchContext {
    /// Filesystem roots.
    pub roots: PathRoots,
    /// Window boundaries for this invocation.
    pub bounds: PeriodBounds,
    /// Fetch settings.
    pub settings: FetchSettings,
    env: Arc<HashMap<String, String>>,
}

impl FetchContext {
    /// Creates a context for the current user, time, and environment.
    pub fn new() -> Result<Self, FetchError> {
        Self::builder().build()
    }

    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }

    /// The reference "now".
    pub fn now(&self) -> DateTime<Utc> {
        self.bounds.now()
    }

    /// Returns an environment variable from the captured snapshot.
    pub fn env(&self, name: &str) -> Option<&str> {
        self.env
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Environment variables consulted for a provider, in order.
    pub fn credential_vars(&self, id: ProviderId, defaults: &[&str]) -> Vec<String> {
        let mut vars = Vec::with_capacity(defaults.len() + 1);
        if let Some(custom) = self.settings.credential_env.get(&id) {
            vars.push(custom.clone());
        }
        for var in defaults {
            if !vars.iter().any(|v| v == var) {
                vars.push((*var).to_string());
            }
        }
        vars
    }

    /// Resolves a credential from the environment.
    pub fn credential(&self, id: ProviderId, defaults: &[&str]) -> Option<Credential> {
        self.credential_vars(id, defaults).into_iter().find_map(|var| {
            self.env(&var).map(|value| Credential {
                value: value.trim().to_string(),
                origin: var,
            })
        })
    }

    /// Returns true if the provider has been disabled.
    pub fn is_disabled(&self, id: ProviderId) -> bool {
        self.settings.disabled.contains(&id)
    }

    /// Returns the timeout for a provider.
    pub fn timeout_for(&self, id: ProviderId, remote: bool) -> Duration {
        if let Some(timeout) = self.settings.provider_timeouts.get(&id) {
            return *timeout;
        }
        if remote {
            self.settings.remote_timeout
        } else {
            self.settings.default_timeout
        }
    }

    /// Builds an HTTP client bounded by the provider's timeout.
    pub fn http_client(&self, id: ProviderId, allowed_domain: &str) -> Result<HttpClient, FetchError> {
        HttpClient::builder()
            .timeout(self.timeout_for(id, true))
            .allowed_domain(allowed_domain)
            .build()
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("roots", &self.roots)
            .field("bounds", &self.bounds)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for constructing a `FetchContext`.
#[derive(Default)]
pub struct FetchContextBuilder {
    roots: Option<PathRoots>,
    bounds: Option<PeriodBounds>,
    now: Option<DateTime<Utc>>,
    env: Option<HashMap<String, String>>,
    settings: FetchSettings,
}

impl FetchContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filesystem roots.
    #[must_use]
    pub fn roots(mut self, roots: PathRoots) -> Self {
        self.roots = Some(roots);
        self
    }

    /// Uses Linux-style roots under a single home directory.
    #[must_use]
    pub fn home(self, home: impl Into<PathBuf>) -> Self {
        self.roots(PathRoots::under(home))
    }

    /// Sets the reference time; bounds use the local timezone.
    #[must_use]
    pub fn now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Sets the window bounds directly.
    #[must_use]
    pub fn bounds(mut self, bounds: PeriodBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Replaces the environment snapshot.
    #[must_use]
    pub fn env(mut self, env: HashMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    /// Adds one variable to the environment snapshot.
    ///
    /// The first call starts from an empty environment.
    #[must_use]
    pub fn env_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Sets the fetch settings.
    #[must_use]
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the local timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.default_timeout = timeout;
        self
    }

    /// Builds the fetch context.
    pub fn build(self) -> Result<FetchContext, FetchError> {
        let roots = match self.roots {
            Some(roots) => roots,
            None => PathRoots::detect().ok_or_else(|| {
                FetchError::InternalFault("cannot determine home directory".to_string())
            })?,
        };
        let bounds = match self.bounds {
            Some(bounds) => bounds,
            None => PeriodBounds::local(self.now.unwrap_or_else(Utc::now))?,
        };
        let env = self.env.unwrap_or_else(|| std::env::vars().collect());

        Ok(FetchContext {
            roots,
            bounds,
            settings: self.settings,
            env: Arc::new(env),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> FetchContextBuilder {
        FetchContext::builder().home("/home/test")
    }

    #[test]
    fn test_roots_under_home() {
        let roots = PathRoots::under("/home/test");
        assert_eq!(roots.config, PathBuf::from("/home/test/.config"));
        assert_eq!(roots.data, PathBuf::from("/home/test/.local/share"));
        assert_eq!(
            roots.home_path(".claude/projects"),
            PathBuf::from("/home/test/.claude/projects")
        );
    }

    #[test]
    fn test_credential_lookup_order() {
        let ctx = ctx()
            .env_var("OPENAI_KEY", "second")
            .env_var("OPENAI_API_KEY", "first")
            .build()
            .unwrap();
        let cred = ctx
            .credential(ProviderId::OpenaiCodex, &["OPENAI_API_KEY", "OPENAI_KEY"])
            .unwrap();
        assert_eq!(cred.origin, "OPENAI_API_KEY");
        assert_eq!(cred.value, "first");
    }

    #[test]
    fn test_credential_custom_var_first() {
        let mut settings = FetchSettings::default();
        settings
            .credential_env
            .insert(ProviderId::OpenaiCodex, "WORK_OPENAI".to_string());
        let ctx = ctx()
            .settings(settings)
            .env_var("WORK_OPENAI", "custom")
            .env_var("OPENAI_API_KEY", "default")
            .build()
            .unwrap();
        let cred = ctx
            .credential(ProviderId::OpenaiCodex, &["OPENAI_API_KEY"])
            .unwrap();
        assert_eq!(cred.value, "custom");
    }

    #[test]
    fn test_blank_credential_is_missing() {
        let ctx = ctx().env_var("GITHUB_TOKEN", "  ").build().unwrap();
        assert!(ctx.credential(ProviderId::GithubCopilot, &["GITHUB_TOKEN"]).is_none());
    }

    #[test]
    fn test_credential_debug_redacts() {
        let cred = Credential {
            origin: "X".into(),
            value: "sk-secret".into(),
        };
        assert!(!format!("{cred:?}").contains("sk-secret"));
    }

    #[test]
    fn test_timeouts() {
        let settings = FetchSettings::default()
            .with_provider_timeout(ProviderId::Cursor, Duration::from_secs(2));
        let ctx = ctx().settings(settings).build().unwrap();
        assert_eq!(ctx.timeout_for(ProviderId::Cursor, false), Duration::from_secs(2));
        assert_eq!(
            ctx.timeout_for(ProviderId::ClaudeCode, false),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
        assert_eq!(
            ctx.timeout_for(ProviderId::OpenaiCodex, true),
            Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS)
        );
    }
}
