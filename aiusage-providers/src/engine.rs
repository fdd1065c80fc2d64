//! Fan-out / fan-in usage engine.
//!
//! Every enabled provider runs in its own tokio task under its own timeout.
//! Results are joined and ordered by registry position, so completion order
//! never shows in the report. A provider that panics or times out becomes an
//! `error` row; the other rows are unaffected.

use std::sync::Arc;
use std::time::Instant;

use aiusage_core::{AggregateReport, ProviderReport};
use aiusage_fetch::{FetchContext, FetchError};
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use crate::descriptor::ProviderDescriptor;
use crate::registry::ProviderRegistry;

// ============================================================================
// Usage Engine
// ============================================================================

/// Runs providers and assembles the aggregate report.
#[derive(Debug, Clone)]
pub struct UsageEngine {
    providers: Vec<&'static ProviderDescriptor>,
}

impl Default for UsageEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageEngine {
    /// Creates an engine over every registered provider.
    pub fn new() -> Self {
        Self::with_providers(ProviderRegistry::all().iter().collect())
    }

    /// Creates an engine over a subset of providers (`--tool`).
    pub fn with_providers(providers: Vec<&'static ProviderDescriptor>) -> Self {
        Self { providers }
    }

    /// The providers this engine will run.
    pub fn providers(&self) -> &[&'static ProviderDescriptor] {
        &self.providers
    }

    /// Runs every enabled provider concurrently.
    #[instrument(skip(self, ctx), fields(providers = self.providers.len()))]
    pub async fn run(&self, ctx: &Arc<FetchContext>) -> AggregateReport {
        let start = Instant::now();

        let tasks = self
            .providers
            .iter()
            .copied()
            .filter(|desc| {
                let disabled = ctx.is_disabled(desc.id);
                if disabled {
                    debug!(provider = %desc.id, "Provider disabled");
                }
                !disabled
            })
            .map(|desc| {
                let ctx = Arc::clone(ctx);
                let handle = tokio::spawn(run_provider(desc, ctx));
                async move {
                    match handle.await {
                        Ok(report) => report,
                        Err(e) => {
                            warn!(provider = %desc.id, error = %e, "Provider task failed");
                            let fault = FetchError::InternalFault(e.to_string());
                            ProviderReport::error(desc.id, desc.capability, fault.to_string())
                        }
                    }
                }
            });

        let rows = join_all(tasks).await;
        let report = AggregateReport::new(ctx.now(), rows);

        info!(
            rows = report.providers.len(),
            active = report.providers.iter().filter(|r| r.is_active()).count(),
            duration = ?start.elapsed(),
            "Usage report assembled"
        );
        report
    }
}

/// Runs one provider's sources under its timeout.
async fn run_provider(desc: &'static ProviderDescriptor, ctx: Arc<FetchContext>) -> ProviderReport {
    let limit = ctx.timeout_for(desc.id, desc.is_remote());
    let pipeline = desc.build_pipeline();
    let start = Instant::now();

    let report = match tokio::time::timeout(limit, pipeline.report(desc.id, desc.capability, &ctx)).await {
        Ok(report) => report,
        Err(_) => {
            warn!(provider = %desc.id, timeout = ?limit, "Provider timed out");
            ProviderReport::error(desc.id, desc.capability, FetchError::Timeout(limit).to_string())
        }
    };

    debug!(
        provider = %desc.id,
        status = ?report.status,
        duration = ?start.elapsed(),
        "Provider finished"
    );
    report
}
