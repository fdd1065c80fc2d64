//! Link-only sources.
//!
//! Tools that expose usage only on a web dashboard are reported as
//! `not_applicable` with the dashboard URL.

use aiusage_fetch::{FetchContext, FetchError, SourceBatch, SourceKind, SourceLocator, UsageSource};
use async_trait::async_trait;

/// A source that points at a web dashboard.
pub struct LinkSource {
    id: &'static str,
    url: &'static str,
}

impl LinkSource {
    /// Creates a link source.
    pub fn new(id: &'static str, url: &'static str) -> Self {
        Self { id, url }
    }
}

#[async_trait]
impl UsageSource for LinkSource {
    fn id(&self) -> &str {
        self.id
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Link
    }

    fn locate(&self, _ctx: &FetchContext) -> SourceLocator {
        SourceLocator::Link(self.url.to_string())
    }

    async fn read(&self, _ctx: &FetchContext) -> Result<SourceBatch, FetchError> {
        Err(FetchError::NotApplicable(self.url.to_string()))
    }
}
