//! OpenAI Codex provider descriptor.

use aiusage_core::{Capability, ProviderId};
use aiusage_fetch::UsageSource;

use super::api::{CodexUsageSource, ENV_VARS};
use crate::descriptor::{ProviderDescriptor, ProviderMetadata};

/// Creates the OpenAI Codex provider descriptor.
pub fn codex_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderId::OpenaiCodex,
        metadata: codex_metadata(),
        capability: Capability::Tokens,
        sources: codex_sources,
    }
}

/// OpenAI Codex metadata.
fn codex_metadata() -> ProviderMetadata {
    ProviderMetadata {
        data_source: "OpenAI organization usage API",
        dashboard_url: Some("https://platform.openai.com/usage"),
        credential_env: ENV_VARS,
        aliases: &["codex", "openai"],
    }
}

fn codex_sources() -> Vec<Box<dyn UsageSource>> {
    vec![Box::new(CodexUsageSource)]
}
