//! Warp provider descriptor.

use std::path::PathBuf;

use aiusage_core::{Capability, ProviderId};
use aiusage_fetch::{PathRoots, UsageSource};

use super::parser::read_warp_db;
use crate::descriptor::{ProviderDescriptor, ProviderMetadata};
use crate::formats::DatabaseSource;

/// Creates the Warp provider descriptor.
pub fn warp_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderId::Warp,
        metadata: warp_metadata(),
        capability: Capability::TotalTokens,
        sources: warp_sources,
    }
}

/// Warp metadata.
fn warp_metadata() -> ProviderMetadata {
    ProviderMetadata {
        data_source: "warp.sqlite agent conversations",
        dashboard_url: Some("https://app.warp.dev/settings/billing"),
        credential_env: &[],
        aliases: &[],
    }
}

/// Location of `warp.sqlite` for the stable channel.
pub(crate) fn warp_db(roots: &PathRoots) -> PathBuf {
    if cfg!(target_os = "macos") {
        roots.home_path(
            "Library/Group Containers/2BBY89MBSN.dev.warp/Library/Application Support/dev.warp.Warp-Stable/warp.sqlite",
        )
    } else if cfg!(target_os = "windows") {
        roots.data_path("Warp/warp.sqlite")
    } else {
        roots.home_path(".local/share/warp/warp.sqlite")
    }
}

fn warp_sources() -> Vec<Box<dyn UsageSource>> {
    vec![Box::new(DatabaseSource::new("warp.sqlite", warp_db, read_warp_db))]
}
