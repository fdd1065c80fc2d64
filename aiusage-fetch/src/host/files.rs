//! Directory scanning helpers.
//!
//! Scans are sorted so repeated runs see files in the same order.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;
use walkdir::WalkDir;

/// Recursively collects files under `root` whose path matches `filter`.
///
/// Missing roots yield an empty list. Entries that cannot be read are
/// skipped with a debug log.
pub fn find_files<F>(root: &Path, max_depth: usize, filter: F) -> Vec<PathBuf>
where
    F: Fn(&Path) -> bool,
{
    if !root.is_dir() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .max_depth(max_depth)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| filter(path))
        .collect();

    files.sort();
    files
}

/// Returns true if the path has one of the given extensions (case-insensitive).
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)))
}

/// Returns the file's modification time.
pub fn modified(path: &Path) -> Option<DateTime<Utc>> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from)
}

/// Keeps the `limit` most recently modified paths, newest first.
pub fn most_recent(paths: Vec<PathBuf>, limit: usize) -> Vec<PathBuf> {
    let mut dated: Vec<(Option<DateTime<Utc>>, PathBuf)> =
        paths.into_iter().map(|p| (modified(&p), p)).collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    dated.into_iter().take(limit).map(|(_, p)| p).collect()
}

// ============================================================================
// Tests
// ============================================================================
