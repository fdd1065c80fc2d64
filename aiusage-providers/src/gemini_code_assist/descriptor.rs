//! Gemini Code Assist provider descriptor.

use std::path::PathBuf;

use aiusage_core::{Capability, ProviderId};
use aiusage_fetch::{PathRoots, UsageSource};

use crate::descriptor::{ProviderDescriptor, ProviderMetadata};
use crate::formats::EncryptedSource;
use crate::paths::vscode_extension_dir;

/// Creates the Gemini Code Assist provider descriptor.
pub fn gemini_code_assist_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderId::GeminiCodeAssist,
        metadata: gemini_code_assist_metadata(),
        capability: Capability::Tokens,
        sources: gemini_code_assist_sources,
    }
}

/// Gemini Code Assist metadata.
fn gemini_code_assist_metadata() -> ProviderMetadata {
    ProviderMetadata {
        data_source: "VS Code globalStorage google.geminicodeassist",
        dashboard_url: Some("https://console.cloud.google.com"),
        credential_env: &[],
        aliases: &["code-assist"],
    }
}

fn extension_dir(roots: &PathRoots) -> PathBuf {
    vscode_extension_dir(roots, "google.geminicodeassist")
}

fn gemini_code_assist_sources() -> Vec<Box<dyn UsageSource>> {
    vec![Box::new(EncryptedSource::new(
        "gemini-code-assist.state",
        extension_dir,
        &[],
        "format not readable, use the Google Cloud console",
    ))]
}
