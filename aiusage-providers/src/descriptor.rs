//! Provider descriptor system.
//!
//! A descriptor contains all the static configuration for a provider:
//! - Identity and capability
//! - Metadata (display name, data-source summary, dashboard URL)
//! - The credential variables a remote provider accepts
//! - The sources to read (how to get usage data)

use aiusage_core::{Capability, ProviderId};
use aiusage_fetch::{SourcePipeline, UsageSource};

// ============================================================================
// Provider Descriptor
// ============================================================================

/// Builds the sources of a provider.
pub type SourceFactory = fn() -> Vec<Box<dyn UsageSource>>;

/// Complete descriptor for a provider.
pub struct ProviderDescriptor {
    /// Provider identifier.
    pub id: ProviderId,
    /// Display metadata.
    pub metadata: ProviderMetadata,
    /// What the provider can measure.
    pub capability: Capability,
    /// Builds the provider's sources.
    pub sources: SourceFactory,
}

impl ProviderDescriptor {
    /// Creates a new descriptor builder.
    pub fn builder(id: ProviderId) -> ProviderDescriptorBuilder {
        ProviderDescriptorBuilder::new(id)
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &str {
        self.id.display_name()
    }

    /// Returns the CLI name.
    pub fn cli_name(&self) -> &str {
        self.id.cli_name()
    }

    /// Builds the source pipeline for this provider.
    pub fn build_pipeline(&self) -> SourcePipeline {
        SourcePipeline::with_sources((self.sources)())
    }

    /// Returns true if any source talks to the network.
    pub fn is_remote(&self) -> bool {
        !self.metadata.credential_env.is_empty()
    }
}

impl std::fmt::Debug for ProviderDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderDescriptor")
            .field("id", &self.id)
            .field("capability", &self.capability)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Provider Metadata
// ============================================================================

/// Human-facing information about a provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderMetadata {
    /// One line describing where the data comes from.
    pub data_source: &'static str,
    /// Where the user can see usage when we cannot.
    pub dashboard_url: Option<&'static str>,
    /// Environment variables that carry the credential, in lookup order.
    pub credential_env: &'static [&'static str],
    /// Extra names accepted by `--tool`.
    pub aliases: &'static [&'static str],
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for `ProviderDescriptor`.
pub struct ProviderDescriptorBuilder {
    id: ProviderId,
    metadata: ProviderMetadata,
    capability: Capability,
    sources: SourceFactory,
}

impl ProviderDescriptorBuilder {
    /// Creates a new builder for the given provider.
    pub fn new(id: ProviderId) -> Self {
        Self {
            id,
            metadata: ProviderMetadata::default(),
            capability: Capability::Tokens,
            sources: Vec::new,
        }
    }

    /// Sets the metadata.
    #[must_use]
    pub fn metadata(mut self, metadata: ProviderMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Sets the capability.
    #[must_use]
    pub fn capability(mut self, capability: Capability) -> Self {
        self.capability = capability;
        self
    }

    /// Sets the source factory.
    #[must_use]
    pub fn sources(mut self, sources: SourceFactory) -> Self {
        self.sources = sources;
        self
    }

    /// Builds the descriptor.
    pub fn build(self) -> ProviderDescriptor {
        ProviderDescriptor {
            id: self.id,
            metadata: self.metadata,
            capability: self.capability,
            sources: self.sources,
        }
    }
}
