//! Replit provider implementation.
//!
//! Replit has no local data or public usage API; usage is only shown on
//! the account page.

use aiusage_core::{Capability, ProviderId};
use aiusage_fetch::UsageSource;

use crate::descriptor::{ProviderDescriptor, ProviderMetadata};
use crate::formats::LinkSource;

const USAGE_URL: &str = "https://replit.com/usage";

/// Creates the Replit provider descriptor.
pub fn replit_descriptor() -> ProviderDescriptor {
    ProviderDescriptor::builder(ProviderId::Replit)
        .metadata(ProviderMetadata {
            data_source: "web dashboard only",
            dashboard_url: Some(USAGE_URL),
            ..ProviderMetadata::default()
        })
        .capability(Capability::LinkOnly)
        .sources(replit_sources)
        .build()
}

fn replit_sources() -> Vec<Box<dyn UsageSource>> {
    vec![Box::new(LinkSource::new("replit.dashboard", USAGE_URL))]
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiusage_core::ReportStatus;
    use aiusage_fetch::FetchContext;

    #[tokio::test]
    async fn test_link_only_row() {
        let desc = replit_descriptor();
        assert!(!desc.is_remote());

        let ctx = FetchContext::builder()
            .home("/nonexistent")
            .env(std::collections::HashMap::new())
            .build()
            .unwrap();
        let report = desc.build_pipeline().report(desc.id, desc.capability, &ctx).await;
        assert_eq!(report.status, ReportStatus::NotApplicable);
        assert_eq!(
            report.diagnostic.as_deref(),
            Some("usage only available at https://replit.com/usage")
        );
        assert_eq!(report.usage.total.request_count, 0);
    }
}
