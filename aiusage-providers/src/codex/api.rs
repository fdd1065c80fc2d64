//! OpenAI organization usage endpoint.

use aiusage_core::{Aggregator, PeriodBounds, ProviderId, UsageEvent, time};
use aiusage_fetch::{FetchContext, FetchError, SourceBatch, SourceKind, SourceLocator, UsageSource};
use async_trait::async_trait;
use chrono::Datelike;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::formats::remote::{get_json, require_credential};

/// Organization usage endpoint.
const USAGE_ENDPOINT: &str = "https://api.openai.com/v1/organization/usage";

/// Environment variables that carry the API key, in lookup order.
pub(crate) const ENV_VARS: &[&str] = &["OPENAI_API_KEY", "OPENAI_KEY"];

// ============================================================================
// Response
// ============================================================================

/// Usage endpoint body.
#[derive(Debug, Default, Deserialize)]
pub struct OpenAiUsageResponse {
    /// One entry per aggregation bucket.
    #[serde(default)]
    pub data: Vec<UsageBucket>,
}

/// One aggregation bucket.
#[derive(Debug, Default, Deserialize)]
pub struct UsageBucket {
    /// Bucket start, epoch seconds.
    pub aggregation_timestamp: Option<i64>,
    /// Requests in the bucket.
    pub n_requests: Option<u64>,
    /// Prompt tokens.
    pub n_context_tokens_total: Option<u64>,
    /// Completion tokens.
    pub n_generated_tokens_total: Option<u64>,
}

impl UsageBucket {
    fn event(&self) -> UsageEvent {
        UsageEvent::new(self.aggregation_timestamp.and_then(time::from_epoch))
            .with_input(self.n_context_tokens_total)
            .with_output(self.n_generated_tokens_total)
            .with_requests(self.n_requests.unwrap_or(0))
    }
}

impl OpenAiUsageResponse {
    /// Parses the endpoint body.
    pub fn parse(value: &Value) -> Result<Self, FetchError> {
        Self::deserialize(value)
            .map_err(|e| FetchError::InvalidResponse(format!("openai usage: {e}")))
    }

    /// Buckets every entry by its aggregation timestamp.
    pub fn into_batch(self, bounds: PeriodBounds) -> SourceBatch {
        let mut aggregator = Aggregator::new(bounds);
        for bucket in &self.data {
            aggregator.add(&bucket.event());
        }
        SourceBatch::from_aggregator(USAGE_ENDPOINT, aggregator)
    }
}

/// Query string covering the current local month up to today.
fn month_query(bounds: &PeriodBounds) -> String {
    let today = bounds.local_date();
    let first = today.with_day(1).unwrap_or(today);
    format!(
        "start_date={}&end_date={}",
        first.format("%Y-%m-%d"),
        today.format("%Y-%m-%d")
    )
}

fn usage_status(status: StatusCode) -> Option<FetchError> {
    match status {
        StatusCode::UNAUTHORIZED => Some(FetchError::AuthFailure("Invalid API key".into())),
        StatusCode::FORBIDDEN => Some(FetchError::AuthFailure(
            "API key lacks permission (org admin / usage:read)".into(),
        )),
        StatusCode::NOT_FOUND => Some(FetchError::Http(
            "usage endpoint not found, may require an organization account".into(),
        )),
        _ => None,
    }
}

// ============================================================================
// Source
// ============================================================================

/// Reads Codex usage from the OpenAI API.
#[derive(Debug, Default)]
pub struct CodexUsageSource;

#[async_trait]
impl UsageSource for CodexUsageSource {
    fn id(&self) -> &str {
        "openai-codex.usage-api"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::RemoteApi
    }

    fn locate(&self, ctx: &FetchContext) -> SourceLocator {
        SourceLocator::Remote {
            endpoint: USAGE_ENDPOINT.to_string(),
            env_vars: ctx.credential_vars(ProviderId::OpenaiCodex, ENV_VARS),
            credential_file: None,
        }
    }

    #[instrument(skip(self, ctx))]
    async fn read(&self, ctx: &FetchContext) -> Result<SourceBatch, FetchError> {
        let credential = require_credential(ctx, ProviderId::OpenaiCodex, ENV_VARS)?;
        debug!(origin = %credential.origin, "Using OpenAI API key");

        let client = ctx.http_client(ProviderId::OpenaiCodex, "api.openai.com")?;
        let url = format!("{USAGE_ENDPOINT}?{}", month_query(&ctx.bounds));
        let body = get_json(
            &client,
            &url,
            &format!("Bearer {}", credential.value),
            Some(usage_status),
        )
        .await?;

        let response = OpenAiUsageResponse::parse(&body)?;
        debug!(buckets = response.data.len(), "OpenAI usage buckets");
        Ok(response.into_batch(ctx.bounds))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn bounds() -> PeriodBounds {
        PeriodBounds::at(&Utc.with_ymd_and_hms(2025, 6, 4, 12, 0, 0).unwrap()).unwrap()
    }

    #[test]
    fn test_buckets_by_aggregation_timestamp() {
        let body = json!({
            "object": "list",
            "data": [
                {"aggregation_timestamp": 1_749_027_600, "n_requests": 3,
                 "n_context_tokens_total": 300, "n_generated_tokens_total": 150},
                {"aggregation_timestamp": 1_748_764_800, "n_requests": 1,
                 "n_context_tokens_total": 10, "n_generated_tokens_total": 5}
            ]
        });
        let batch = OpenAiUsageResponse::parse(&body).unwrap().into_batch(bounds());
        let today = batch.windows.today;
        assert_eq!(today.input_tokens, Some(300));
        assert_eq!(today.output_tokens, Some(150));
        assert_eq!(today.total_tokens, Some(450));
        assert_eq!(today.request_count, 3);
        assert_eq!(batch.windows.this_month.total_tokens, Some(465));
        assert_eq!(batch.windows.this_month.request_count, 4);
    }

    #[test]
    fn test_empty_data() {
        let batch = OpenAiUsageResponse::parse(&json!({}))
            .unwrap()
            .into_batch(bounds());
        assert_eq!(batch.events, 0);
    }

    #[test]
    fn test_wrong_shape_is_invalid_response() {
        let err = OpenAiUsageResponse::parse(&json!({"data": "nope"})).unwrap_err();
        assert!(matches!(err, FetchError::InvalidResponse(_)));
    }

    #[test]
    fn test_month_query() {
        assert_eq!(month_query(&bounds()), "start_date=2025-06-01&end_date=2025-06-04");

        // 05:00 on June 1st at UTC+10 is still May 31st in UTC.
        let tz = chrono::FixedOffset::east_opt(10 * 3600).unwrap();
        let early = PeriodBounds::at(&tz.with_ymd_and_hms(2025, 6, 1, 5, 0, 0).unwrap()).unwrap();
        assert_eq!(month_query(&early), "start_date=2025-06-01&end_date=2025-06-01");
    }

    #[test]
    fn test_status_overrides() {
        assert_eq!(
            usage_status(StatusCode::UNAUTHORIZED).unwrap().to_string(),
            "authentication failed: Invalid API key"
        );
        assert!(usage_status(StatusCode::NOT_FOUND).unwrap().to_string().contains("organization"));
        assert!(usage_status(StatusCode::TOO_MANY_REQUESTS).is_none());
    }

    #[tokio::test]
    async fn test_missing_key_never_calls_network() {
        let ctx = FetchContext::builder()
            .home("/home/test")
            .env(Default::default())
            .build()
            .unwrap();
        let err = CodexUsageSource.read(&ctx).await.unwrap_err();
        assert_eq!(err.to_string(), "credential not set (OPENAI_API_KEY or OPENAI_KEY)");
    }
}
