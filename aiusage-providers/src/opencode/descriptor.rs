//! OpenCode provider descriptor.

use std::path::PathBuf;

use aiusage_core::{Capability, ProviderId};
use aiusage_fetch::{PathRoots, UsageSource};

use super::parser::parse_message_file;
use crate::descriptor::{ProviderDescriptor, ProviderMetadata};
use crate::formats::logs::is_json;
use crate::formats::{LogFormat, LogSource, LogTarget};
use crate::paths::xdg_data_path;

/// Creates the OpenCode provider descriptor.
pub fn opencode_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderId::OpenCode,
        metadata: opencode_metadata(),
        capability: Capability::Tokens,
        sources: opencode_sources,
    }
}

/// OpenCode metadata.
fn opencode_metadata() -> ProviderMetadata {
    ProviderMetadata {
        data_source: "~/.local/share/opencode/storage/message JSON files",
        dashboard_url: None,
        credential_env: &[],
        aliases: &["open-code"],
    }
}

fn message_dir(roots: &PathRoots) -> PathBuf {
    xdg_data_path(roots, "opencode/storage/message")
}

fn opencode_sources() -> Vec<Box<dyn UsageSource>> {
    vec![Box::new(LogSource::new(
        "opencode.messages",
        LogTarget::Dir {
            root: message_dir,
            depth: 3,
            filter: is_json,
        },
        LogFormat::Documents(parse_message_file),
    ))]
}
