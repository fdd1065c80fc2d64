//! Cursor provider descriptor.

use std::path::PathBuf;

use aiusage_core::{Capability, ProviderId};
use aiusage_fetch::host::files;
use aiusage_fetch::{PathRoots, UsageSource};

use super::parser::read_state_db;
use crate::descriptor::{ProviderDescriptor, ProviderMetadata};
use crate::formats::DatabaseSource;
use crate::paths::editor_user_dir;

/// Number of workspace databases read besides the global one.
const RECENT_WORKSPACES: usize = 10;

/// Creates the Cursor provider descriptor.
pub fn cursor_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderId::Cursor,
        metadata: cursor_metadata(),
        capability: Capability::Tokens,
        sources: cursor_sources,
    }
}

/// Cursor metadata.
fn cursor_metadata() -> ProviderMetadata {
    ProviderMetadata {
        data_source: "Cursor state.vscdb (cursorDiskKV composer and bubble entries)",
        dashboard_url: Some("https://cursor.com/settings"),
        credential_env: &[],
        aliases: &[],
    }
}

fn global_db(roots: &PathRoots) -> PathBuf {
    editor_user_dir(roots, "Cursor").join("globalStorage/state.vscdb")
}

fn workspace_dbs(roots: &PathRoots) -> Vec<PathBuf> {
    let root = editor_user_dir(roots, "Cursor").join("workspaceStorage");
    let found = files::find_files(&root, 2, |p| {
        p.file_name().is_some_and(|n| n == "state.vscdb")
    });
    files::most_recent(found, RECENT_WORKSPACES)
}

fn cursor_sources() -> Vec<Box<dyn UsageSource>> {
    vec![Box::new(
        DatabaseSource::new("cursor.state", global_db, read_state_db).with_extra(workspace_dbs),
    )]
}
