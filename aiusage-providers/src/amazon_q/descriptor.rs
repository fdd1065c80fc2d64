//! Amazon Q provider descriptor.

use std::path::PathBuf;

use aiusage_core::{Capability, ProviderId};
use aiusage_fetch::{PathRoots, UsageSource};

use super::parser::parse_log_line;
use crate::descriptor::{ProviderDescriptor, ProviderMetadata};
use crate::formats::{LogFormat, LogSource, LogTarget};

/// Creates the Amazon Q provider descriptor.
pub fn amazon_q_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderId::AmazonQ,
        metadata: amazon_q_metadata(),
        capability: Capability::Tokens,
        sources: amazon_q_sources,
    }
}

/// Amazon Q metadata.
fn amazon_q_metadata() -> ProviderMetadata {
    ProviderMetadata {
        data_source: "~/.aws/q/q_developer_log.txt",
        dashboard_url: Some("https://console.aws.amazon.com/amazonq"),
        credential_env: &[],
        aliases: &["q", "amazonq"],
    }
}

fn developer_log(roots: &PathRoots) -> PathBuf {
    roots.home_path(".aws/q/q_developer_log.txt")
}

fn amazon_q_sources() -> Vec<Box<dyn UsageSource>> {
    vec![Box::new(LogSource::new(
        "amazon-q.developer-log",
        LogTarget::File(developer_log),
        LogFormat::Text(parse_log_line),
    ))]
}
