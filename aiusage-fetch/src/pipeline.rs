//! Source pipeline for reading every source of one provider.
//!
//! Unlike a first-success chain, every source is read: a provider's usage
//! is the merge of all sources that could be read. The outcome is then
//! classified into exactly one report row.

use std::time::Instant;

use aiusage_core::{Capability, ProviderId, ProviderReport, ReportStatus, UsageWindows};
use tracing::{debug, instrument, warn};

use crate::context::FetchContext;
use crate::error::FetchError;
use crate::strategy::{SourceBatch, UsageSource};

// ============================================================================
// Source Outcome
// ============================================================================

/// The outcome of reading all of a provider's sources.
#[derive(Debug, Default)]
pub struct SourceOutcome {
    /// Successful reads.
    pub batches: Vec<SourceBatch>,
    /// Failed reads, with the location each one was looking at.
    pub failures: Vec<(String, FetchError)>,
}

impl SourceOutcome {
    /// Returns true if at least one source was read.
    pub fn is_success(&self) -> bool {
        !self.batches.is_empty()
    }

    /// Classifies the outcome into a report row.
    ///
    /// - any source read: `active`, windows merged, failures of other
    ///   sources (except "not found") appended to the diagnostic;
    /// - otherwise the most severe failure decides the status and message.
    pub fn into_report(self, id: ProviderId, capability: Capability) -> ProviderReport {
        if self.batches.is_empty() {
            return Self::failure_report(id, capability, self.failures);
        }

        let mut windows = UsageWindows::default();
        let mut skipped = 0;
        let mut locations = Vec::new();
        let mut notes = Vec::new();

        for batch in self.batches {
            windows.merge(&batch.windows);
            skipped += batch.skipped;
            if !locations.contains(&batch.location) {
                locations.push(batch.location);
            }
            notes.extend(batch.notes);
        }

        if skipped > 0 {
            notes.push(format!("skipped {skipped} malformed record(s)"));
        }
        notes.extend(
            self.failures
                .iter()
                .filter(|(_, e)| !e.is_not_found())
                .map(|(location, e)| format!("{location}: {e}")),
        );

        let mut report = ProviderReport::active(id, capability, windows)
            .with_source(locations.join("; "))
            .with_skipped(skipped);
        if !notes.is_empty() {
            report = report.with_diagnostic(notes.join("; "));
        }
        report
    }

    fn failure_report(
        id: ProviderId,
        capability: Capability,
        failures: Vec<(String, FetchError)>,
    ) -> ProviderReport {
        let Some(max) = failures.iter().map(|(_, e)| e.severity()).max() else {
            return ProviderReport::error(id, capability, "no data sources configured");
        };

        let worst: Vec<&(String, FetchError)> =
            failures.iter().filter(|(_, e)| e.severity() == max).collect();
        let status = worst[0].1.status();
        let message = worst
            .iter()
            .map(|(_, e)| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        let source = worst
            .iter()
            .map(|(location, _)| location.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        let report = match status {
            ReportStatus::Unavailable => ProviderReport::unavailable(id, capability, message),
            ReportStatus::NotApplicable => ProviderReport::not_applicable(id, capability, message),
            ReportStatus::Active | ReportStatus::Error => ProviderReport::error(id, capability, message),
        };
        report.with_source(source)
    }
}

// ============================================================================
// Source Pipeline
// ============================================================================

/// All sources of one provider.
pub struct SourcePipeline {
    sources: Vec<Box<dyn UsageSource>>,
}

impl SourcePipeline {
    /// Creates a pipeline with the given sources, read in order.
    pub fn with_sources(sources: Vec<Box<dyn UsageSource>>) -> Self {
        Self { sources }
    }

    /// Returns the number of sources in the pipeline.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if the pipeline is empty.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Returns true if any source talks to the network.
    pub fn is_remote(&self) -> bool {
        self.sources.iter().any(|s| s.kind().is_remote())
    }

    /// The sources, in order.
    pub fn sources(&self) -> &[Box<dyn UsageSource>] {
        &self.sources
    }

    /// Reads every source.
    #[instrument(skip(self, ctx), fields(sources = self.sources.len()))]
    pub async fn execute(&self, ctx: &FetchContext) -> SourceOutcome {
        let start = Instant::now();
        let mut outcome = SourceOutcome::default();

        for source in &self.sources {
            let source_id = source.id();
            let kind = source.kind();
            let location = source.locate(ctx).location();
            let attempt_start = Instant::now();

            debug!(source = %source_id, kind = %kind, %location, "Reading source");

            let result = source.read(ctx).await;
            let duration = attempt_start.elapsed();

            match result {
                Ok(batch) => {
                    debug!(
                        source = %source_id,
                        events = batch.events,
                        skipped = batch.skipped,
                        duration = ?duration,
                        "Source read"
                    );
                    outcome.batches.push(batch);
                }
                Err(error) => {
                    if error.status() == ReportStatus::Error {
                        warn!(source = %source_id, error = %error, duration = ?duration, "Source failed");
                    } else {
                        debug!(source = %source_id, error = %error, "Source unavailable");
                    }
                    outcome.failures.push((location, error));
                }
            }
        }

        debug!(
            read = outcome.batches.len(),
            failed = outcome.failures.len(),
            duration = ?start.elapsed(),
            "Sources done"
        );
        outcome
    }

    /// Reads every source and classifies the result.
    pub async fn report(
        &self,
        id: ProviderId,
        capability: Capability,
        ctx: &FetchContext,
    ) -> ProviderReport {
        self.execute(ctx).await.into_report(id, capability)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::SourceLocator;
    use crate::strategy::SourceKind;
    use aiusage_core::{Aggregator, UsageEvent};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    enum Behavior {
        Tokens(u64),
        Fail(fn(String) -> FetchError),
    }

    struct MockSource {
        id: String,
        kind: SourceKind,
        behavior: Behavior,
    }

    impl MockSource {
        fn tokens(id: &str, tokens: u64) -> Box<dyn UsageSource> {
            Box::new(Self {
                id: id.to_string(),
                kind: SourceKind::LogFiles,
                behavior: Behavior::Tokens(tokens),
            })
        }

        fn failing(id: &str, make: fn(String) -> FetchError) -> Box<dyn UsageSource> {
            Box::new(Self {
                id: id.to_string(),
                kind: SourceKind::Database,
                behavior: Behavior::Fail(make),
            })
        }
    }

    #[async_trait]
    impl UsageSource for MockSource {
        fn id(&self) -> &str {
            &self.id
        }

        fn kind(&self) -> SourceKind {
            self.kind
        }

        fn locate(&self, _ctx: &FetchContext) -> SourceLocator {
            SourceLocator::File(format!("/mock/{}", self.id).into())
        }

        async fn read(&self, ctx: &FetchContext) -> Result<SourceBatch, FetchError> {
            match &self.behavior {
                Behavior::Tokens(n) => {
                    let mut agg = Aggregator::new(ctx.bounds);
                    agg.add(&UsageEvent::at(ctx.now()).with_input(Some(*n)));
                    Ok(SourceBatch::from_aggregator(format!("/mock/{}", self.id), agg))
                }
                Behavior::Fail(make) => Err(make(format!("/mock/{}", self.id))),
            }
        }
    }

    fn ctx() -> FetchContext {
        FetchContext::builder()
            .home("/home/test")
            .now(Utc.with_ymd_and_hms(2025, 6, 4, 12, 0, 0).unwrap())
            .env(Default::default())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_empty_pipeline() {
        let pipeline = SourcePipeline::with_sources(vec![]);
        let report = pipeline.report(ProviderId::Cursor, Capability::Tokens, &ctx()).await;
        assert_eq!(report.status, ReportStatus::Error);
    }

    #[tokio::test]
    async fn test_merges_all_successful_sources() {
        let pipeline = SourcePipeline::with_sources(vec![
            MockSource::tokens("a", 10),
            MockSource::tokens("b", 5),
        ]);
        let outcome = pipeline.execute(&ctx()).await;
        assert_eq!(outcome.batches.len(), 2);
        assert!(outcome.failures.is_empty());

        let report = outcome.into_report(ProviderId::Cline, Capability::Tokens);
        assert_eq!(report.status, ReportStatus::Active);
        assert_eq!(report.usage.total.input_tokens, Some(15));
        assert_eq!(report.source.as_deref(), Some("/mock/a; /mock/b"));
        assert!(report.diagnostic.is_none());
    }

    #[tokio::test]
    async fn test_partial_failure_is_active_with_diagnostic() {
        let pipeline = SourcePipeline::with_sources(vec![
            MockSource::tokens("logs", 1),
            MockSource::failing("db", |_| FetchError::MalformedRecord("bad header".into())),
            MockSource::failing("alt", FetchError::SourceNotFound),
        ]);
        let report = pipeline.report(ProviderId::Windsurf, Capability::Tokens, &ctx()).await;
        assert_eq!(report.status, ReportStatus::Active);
        let diagnostic = report.diagnostic.unwrap();
        assert!(diagnostic.contains("malformed record"));
        assert!(!diagnostic.contains("not found"));
    }

    #[tokio::test]
    async fn test_all_missing_is_unavailable_naming_path() {
        let pipeline =
            SourcePipeline::with_sources(vec![MockSource::failing("db", FetchError::SourceNotFound)]);
        let report = pipeline.report(ProviderId::Warp, Capability::TotalTokens, &ctx()).await;
        assert_eq!(report.status, ReportStatus::Unavailable);
        assert!(report.diagnostic.unwrap().contains("/mock/db"));
        assert_eq!(report.usage, UsageWindows::default());
    }

    #[tokio::test]
    async fn test_worst_failure_wins() {
        let pipeline = SourcePipeline::with_sources(vec![
            MockSource::failing("logs", FetchError::SourceNotFound),
            MockSource::failing("pb", |_| FetchError::SourceUnreadable("encrypted".into())),
        ]);
        let report = pipeline.report(ProviderId::Windsurf, Capability::Tokens, &ctx()).await;
        assert_eq!(report.status, ReportStatus::Unavailable);
        assert_eq!(report.diagnostic.as_deref(), Some("encrypted"));
        assert_eq!(report.source.as_deref(), Some("/mock/pb"));

        let pipeline = SourcePipeline::with_sources(vec![
            MockSource::failing("pb", |_| FetchError::SourceUnreadable("encrypted".into())),
            MockSource::failing("db", |_| FetchError::InternalFault("boom".into())),
        ]);
        let report = pipeline.report(ProviderId::Windsurf, Capability::Tokens, &ctx()).await;
        assert_eq!(report.status, ReportStatus::Error);
    }

    #[tokio::test]
    async fn test_skipped_records_reported() {
        struct Skippy;

        #[async_trait]
        impl UsageSource for Skippy {
            fn id(&self) -> &str {
                "skippy"
            }
            fn kind(&self) -> SourceKind {
                SourceKind::LogFiles
            }
            fn locate(&self, _ctx: &FetchContext) -> SourceLocator {
                SourceLocator::File("/mock/skippy".into())
            }
            async fn read(&self, ctx: &FetchContext) -> Result<SourceBatch, FetchError> {
                Ok(SourceBatch::empty("/mock/skippy", ctx.bounds).with_skipped(4))
            }
        }

        let pipeline = SourcePipeline::with_sources(vec![Box::new(Skippy)]);
        let report = pipeline.report(ProviderId::AmazonQ, Capability::Tokens, &ctx()).await;
        assert_eq!(report.skipped_records, 4);
        assert!(report.diagnostic.unwrap().contains("skipped 4"));
        // Zero usage on a token provider is still active with zero windows.
        assert_eq!(report.usage.today.total_tokens, Some(0));
    }
}
