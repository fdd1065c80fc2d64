//! GitHub Copilot provider descriptor.

use aiusage_core::{Capability, ProviderId};
use aiusage_fetch::UsageSource;

use super::api::CopilotApiSource;
use super::token_store::ENV_VARS;
use crate::descriptor::{ProviderDescriptor, ProviderMetadata};

/// Creates the GitHub Copilot provider descriptor.
pub fn copilot_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderId::GithubCopilot,
        metadata: copilot_metadata(),
        capability: Capability::RequestsOnly,
        sources: copilot_sources,
    }
}

/// GitHub Copilot metadata.
fn copilot_metadata() -> ProviderMetadata {
    ProviderMetadata {
        data_source: "GitHub API copilot_internal/user (request counter, limited plans)",
        dashboard_url: Some("https://github.com/settings/copilot"),
        credential_env: ENV_VARS,
        aliases: &["copilot"],
    }
}

fn copilot_sources() -> Vec<Box<dyn UsageSource>> {
    vec![Box::new(CopilotApiSource)]
}
