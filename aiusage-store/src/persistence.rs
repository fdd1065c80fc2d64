//! File persistence helpers.
//!
//! aiusage writes exactly one file of its own, the config, and never
//! touches a tool's data. Writes are atomic and owner-only on Unix.

use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StoreError;

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default configuration directory.
///
/// - macOS: `~/Library/Application Support/aiusage`
/// - Linux: `~/.config/aiusage`
/// - Windows: `%APPDATA%\aiusage`
pub fn default_config_dir() -> Result<PathBuf, StoreError> {
    dirs::config_dir()
        .map(|c| c.join("aiusage"))
        .ok_or(StoreError::NoConfigDir)
}

/// Returns the default config file path.
pub fn default_config_path() -> Result<PathBuf, StoreError> {
    Ok(default_config_dir()?.join("config.json"))
}

// ============================================================================
// Security: File Permissions
// ============================================================================

/// Sets restrictive file permissions (0o600) on Unix systems.
#[cfg(unix)]
async fn set_restrictive_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = tokio::fs::metadata(path).await?;
    let mut perms = metadata.permissions();
    perms.set_mode(0o600);
    tokio::fs::set_permissions(path, perms).await?;

    debug!(path = %path.display(), mode = "0600", "Set restrictive permissions");
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
async fn set_restrictive_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ============================================================================
// File Operations
// ============================================================================

/// Saves data to a JSON file.
///
/// Creates parent directories if they don't exist, writes atomically
/// (via temp file + rename), and sets restrictive permissions on Unix.
pub async fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    debug!(path = %path.display(), "Saving JSON file");

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut json = serde_json::to_string_pretty(data)?;
    json.push('\n');

    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, &json).await?;
    tokio::fs::rename(&temp_path, path).await?;

    set_restrictive_permissions(path).await?;

    debug!(path = %path.display(), "JSON file saved");
    Ok(())
}

/// Loads data from a JSON file.
///
/// Returns `Ok(None)` when the file does not exist; any other failure,
/// including a parse error, is an error.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "File not found");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| StoreError::InvalidConfig {
            path: path.to_path_buf(),
            source,
        })
}

// ============================================================================
// Tests
// ============================================================================
