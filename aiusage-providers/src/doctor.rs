//! Source diagnostics.
//!
//! The doctor resolves every source locator of every provider and reports
//! what it found. It only checks existence; nothing is opened or parsed, so
//! it stays fast even when a tool has years of logs.

use aiusage_core::{Capability, ProviderId};
use aiusage_fetch::{FetchContext, Resolution, SourceKind};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::descriptor::ProviderDescriptor;
use crate::registry::ProviderRegistry;

// ============================================================================
// Report Types
// ============================================================================

/// Resolution of one source.
#[derive(Debug, Clone, Serialize)]
pub struct SourceCheck {
    /// Source identifier (`{provider}.{source}`).
    pub source_id: String,
    /// Storage technology.
    pub kind: SourceKind,
    /// What the locator resolved to.
    #[serde(flatten)]
    pub resolution: Resolution,
}

/// Diagnostics for one provider.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderCheck {
    /// Provider identifier.
    pub provider: ProviderId,
    /// Display name.
    pub display_name: String,
    /// What the provider measures.
    pub capability: Capability,
    /// True if any source's data or credential is present.
    pub reachable: bool,
    /// Per-source results, in read order.
    pub sources: Vec<SourceCheck>,
    /// Credential variables a remote provider accepts.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub credential_env: Vec<String>,
    /// Where usage can be checked by hand.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,
    /// True if the provider is disabled in the config.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

/// Diagnostics for every provider.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    /// One entry per provider, in registry order.
    pub checks: Vec<ProviderCheck>,
    /// Providers with at least one reachable source.
    pub found: usize,
    /// Providers checked.
    pub total: usize,
}

// ============================================================================
// Doctor
// ============================================================================

/// Runs locator checks.
#[derive(Debug, Default)]
pub struct Doctor;

impl Doctor {
    /// Checks every registered provider.
    pub fn run(ctx: &FetchContext) -> DoctorReport {
        Self::run_for(ProviderRegistry::all().iter(), ctx)
    }

    /// Checks the given providers.
    #[instrument(skip_all)]
    pub fn run_for<'a>(
        providers: impl IntoIterator<Item = &'a ProviderDescriptor>,
        ctx: &FetchContext,
    ) -> DoctorReport {
        let checks: Vec<ProviderCheck> = providers.into_iter().map(|d| check(d, ctx)).collect();
        let found = checks.iter().filter(|c| c.reachable).count();
        DoctorReport {
            total: checks.len(),
            found,
            checks,
        }
    }
}

fn check(desc: &ProviderDescriptor, ctx: &FetchContext) -> ProviderCheck {
    let sources: Vec<SourceCheck> = (desc.sources)()
        .iter()
        .map(|source| SourceCheck {
            source_id: source.id().to_string(),
            kind: source.kind(),
            resolution: source.locate(ctx).resolve(ctx),
        })
        .collect();
    let reachable = sources.iter().any(|s| s.resolution.found);
    debug!(provider = %desc.id, reachable, sources = sources.len(), "Provider checked");

    let credential_env = if desc.is_remote() {
        ctx.credential_vars(desc.id, desc.metadata.credential_env)
    } else {
        Vec::new()
    };

    ProviderCheck {
        provider: desc.id,
        display_name: desc.display_name().to_string(),
        capability: desc.capability,
        reachable,
        sources,
        credential_env,
        dashboard_url: desc.metadata.dashboard_url.map(str::to_string),
        disabled: ctx.is_disabled(desc.id),
    }
}

// ============================================================================
// Tests
// ============================================================================
