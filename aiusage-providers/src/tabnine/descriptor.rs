//! Tabnine provider descriptor.

use std::path::{Path, PathBuf};

use aiusage_core::{Capability, ProviderId};
use aiusage_fetch::host::files;
use aiusage_fetch::{PathRoots, UsageSource};

use super::parser::parse_completion_line;
use crate::descriptor::{ProviderDescriptor, ProviderMetadata};
use crate::formats::{LogFormat, LogSource, LogTarget};

/// Creates the Tabnine provider descriptor.
pub fn tabnine_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderId::Tabnine,
        metadata: tabnine_metadata(),
        capability: Capability::Tokens,
        sources: tabnine_sources,
    }
}

/// Tabnine metadata.
fn tabnine_metadata() -> ProviderMetadata {
    ProviderMetadata {
        data_source: "TabNine/logs completion events",
        dashboard_url: Some("https://console.tabnine.com"),
        credential_env: &[],
        aliases: &[],
    }
}

fn logs_dir(roots: &PathRoots) -> PathBuf {
    roots.data_path("TabNine/logs")
}

fn is_log(path: &Path) -> bool {
    files::has_extension(path, &["log", "json", "jsonl"])
}

fn tabnine_sources() -> Vec<Box<dyn UsageSource>> {
    vec![Box::new(LogSource::new(
        "tabnine.logs",
        LogTarget::Dir {
            root: logs_dir,
            depth: 1,
            filter: is_log,
        },
        LogFormat::MixedLines(parse_completion_line),
    ))]
}
