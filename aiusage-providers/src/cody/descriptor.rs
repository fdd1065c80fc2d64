//! Sourcegraph Cody provider descriptor.

use std::path::PathBuf;

use aiusage_core::{Capability, ProviderId};
use aiusage_fetch::{PathRoots, UsageSource};

use super::parser::parse_chat_history;
use crate::descriptor::{ProviderDescriptor, ProviderMetadata};
use crate::formats::logs::is_json;
use crate::formats::{LogFormat, LogSource, LogTarget};
use crate::paths::vscode_extension_dir;

/// Creates the Sourcegraph Cody provider descriptor.
pub fn cody_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderId::SourcegraphCody,
        metadata: cody_metadata(),
        capability: Capability::RequestsOnly,
        sources: cody_sources,
    }
}

/// Sourcegraph Cody metadata.
fn cody_metadata() -> ProviderMetadata {
    ProviderMetadata {
        data_source: "VS Code globalStorage sourcegraph.cody-ai chat history",
        dashboard_url: Some("https://sourcegraph.com/cody/manage"),
        credential_env: &[],
        aliases: &["cody"],
    }
}

fn extension_dir(roots: &PathRoots) -> PathBuf {
    vscode_extension_dir(roots, "sourcegraph.cody-ai")
}

fn cody_sources() -> Vec<Box<dyn UsageSource>> {
    vec![Box::new(LogSource::new(
        "sourcegraph-cody.history",
        LogTarget::Dir {
            root: extension_dir,
            depth: 1,
            filter: is_json,
        },
        LogFormat::Documents(parse_chat_history),
    ))]
}
