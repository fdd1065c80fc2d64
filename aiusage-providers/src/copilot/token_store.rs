//! Copilot credential lookup.

use std::fs;
use std::path::{Path, PathBuf};

use aiusage_core::ProviderId;
use aiusage_fetch::{Credential, FetchContext, PathRoots};
use serde::Deserialize;
use tracing::debug;

/// Environment variables checked for a GitHub token.
pub const ENV_VARS: &[&str] = &["GITHUB_TOKEN", "GH_TOKEN"];

// ============================================================================
// File Formats
// ============================================================================

/// `hosts.json` written by the Copilot editor plugins, and `hosts.yml`
/// written by the GitHub CLI. Both key hosts by name.
#[derive(Debug, Deserialize)]
struct Hosts {
    #[serde(rename = "github.com")]
    github: Option<HostEntry>,
}

#[derive(Debug, Deserialize)]
struct HostEntry {
    oauth_token: Option<String>,
}

impl Hosts {
    fn token(self) -> Option<String> {
        self.github?
            .oauth_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

// ============================================================================
// Token Store
// ============================================================================

/// Read-only lookup of a GitHub token.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopilotTokenStore;

impl CopilotTokenStore {
    /// Path of the editor plugins' `hosts.json`.
    pub fn plugin_hosts_path(roots: &PathRoots) -> PathBuf {
        roots.home_path(".config/github-copilot/hosts.json")
    }

    /// Path of the GitHub CLI's `hosts.yml`.
    pub fn gh_cli_hosts_path(roots: &PathRoots) -> PathBuf {
        roots.home_path(".config/gh/hosts.yml")
    }

    /// Finds a token: environment first, then the plugin and CLI host files.
    pub fn load(ctx: &FetchContext) -> Option<Credential> {
        if let Some(credential) = ctx.credential(ProviderId::GithubCopilot, ENV_VARS) {
            return Some(credential);
        }

        let plugin = Self::plugin_hosts_path(&ctx.roots);
        if let Some(value) = Self::load_json(&plugin) {
            return Some(Credential {
                origin: plugin.display().to_string(),
                value,
            });
        }

        let gh = Self::gh_cli_hosts_path(&ctx.roots);
        Self::load_yaml(&gh).map(|value| Credential {
            origin: gh.display().to_string(),
            value,
        })
    }

    fn load_json(path: &Path) -> Option<String> {
        let content = fs::read_to_string(path).ok()?;
        match serde_json::from_str::<Hosts>(&content) {
            Ok(hosts) => hosts.token(),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Unreadable hosts.json");
                None
            }
        }
    }

    fn load_yaml(path: &Path) -> Option<String> {
        let content = fs::read_to_string(path).ok()?;
        match serde_yaml::from_str::<Hosts>(&content) {
            Ok(hosts) => hosts.token(),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Unreadable hosts.yml");
                None
            }
        }
    }
}
