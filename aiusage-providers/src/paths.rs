//! Platform-specific tool locations.
//!
//! Every function takes [`PathRoots`] so tests can point tools at a
//! temporary home directory.

use std::path::PathBuf;

use aiusage_fetch::PathRoots;

/// Where a VS Code-family editor keeps its `User` directory.
///
/// Linux uses the config dir; macOS and Windows use the data dir.
pub fn editor_user_dir(roots: &PathRoots, app: &str) -> PathBuf {
    if cfg!(target_os = "linux") {
        roots.config_path(app).join("User")
    } else {
        roots.data_path(app).join("User")
    }
}

/// A VS Code extension's `globalStorage` directory.
pub fn vscode_extension_dir(roots: &PathRoots, extension: &str) -> PathBuf {
    roots.vscode_global_storage().join(extension)
}

/// XDG-style data directory that some CLIs use on every Unix.
pub fn xdg_data_path(roots: &PathRoots, relative: &str) -> PathBuf {
    if cfg!(target_os = "windows") {
        roots.data_path(relative)
    } else {
        roots.home_path(".local/share").join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_dirs_under_roots() {
        let roots = PathRoots::under("/home/test");
        let cursor = editor_user_dir(&roots, "Cursor");
        assert!(cursor.starts_with("/home/test"));
        assert!(cursor.ends_with("Cursor/User"));

        let cline = vscode_extension_dir(&roots, "saoudrizwan.claude-dev");
        assert!(cline.ends_with("globalStorage/saoudrizwan.claude-dev"));
    }

    #[test]
    fn test_xdg_data_path() {
        let roots = PathRoots::under("/home/test");
        let path = xdg_data_path(&roots, "opencode/storage/message");
        assert!(path.ends_with("opencode/storage/message"));
    }
}
