//! Copilot user endpoint.

use aiusage_core::{Aggregator, PeriodBounds, ProviderId, UsageEvent};
use aiusage_fetch::{FetchContext, FetchError, SourceBatch, SourceKind, SourceLocator, UsageSource};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use super::token_store::{CopilotTokenStore, ENV_VARS};
use crate::formats::remote::get_json;

/// Copilot user endpoint.
const USER_ENDPOINT: &str = "https://api.github.com/copilot_internal/user";

// ============================================================================
// Response
// ============================================================================

/// The fields of the user endpoint that carry usage.
#[derive(Debug, Default, Deserialize)]
pub struct CopilotUserResponse {
    /// Requests used in the current period (limited plans only).
    #[serde(default)]
    pub limited_user_usage: Option<u64>,
    /// When the period resets.
    #[serde(default)]
    pub limited_user_reset_date: Option<String>,
    /// Plan name.
    #[serde(default)]
    pub copilot_plan: Option<String>,
}

impl CopilotUserResponse {
    /// Parses the endpoint body.
    pub fn parse(value: &Value) -> Result<Self, FetchError> {
        Self::deserialize(value)
            .map_err(|e| FetchError::InvalidResponse(format!("copilot user: {e}")))
    }

    /// Buckets the response. The counter is untimed, so it lands in `total` only.
    pub fn into_batch(self, bounds: PeriodBounds) -> SourceBatch {
        let mut aggregator = Aggregator::new(bounds);
        let note = match self.limited_user_usage {
            Some(used) => {
                aggregator.add(&UsageEvent::new(None).with_requests(used));
                None
            }
            None => Some(format!(
                "{} plan does not report request counts",
                self.copilot_plan.as_deref().unwrap_or("this")
            )),
        };

        let batch = SourceBatch::from_aggregator(USER_ENDPOINT, aggregator);
        match note {
            Some(note) => batch.with_note(note),
            None => batch,
        }
    }
}

// ============================================================================
// Source
// ============================================================================

/// Reads Copilot usage from the GitHub API.
#[derive(Debug, Default)]
pub struct CopilotApiSource;

#[async_trait]
impl UsageSource for CopilotApiSource {
    fn id(&self) -> &str {
        "github-copilot.api"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::RemoteApi
    }

    fn locate(&self, ctx: &FetchContext) -> SourceLocator {
        SourceLocator::Remote {
            endpoint: USER_ENDPOINT.to_string(),
            env_vars: ctx.credential_vars(ProviderId::GithubCopilot, ENV_VARS),
            credential_file: Some(CopilotTokenStore::plugin_hosts_path(&ctx.roots)),
        }
    }

    #[instrument(skip(self, ctx))]
    async fn read(&self, ctx: &FetchContext) -> Result<SourceBatch, FetchError> {
        let credential = CopilotTokenStore::load(ctx).ok_or_else(|| {
            FetchError::CredentialMissing(
                ctx.credential_vars(ProviderId::GithubCopilot, ENV_VARS).join(" or "),
            )
        })?;
        debug!(origin = %credential.origin, "Using GitHub token");

        let client = ctx.http_client(ProviderId::GithubCopilot, "api.github.com")?;
        let body = get_json(
            &client,
            USER_ENDPOINT,
            &format!("token {}", credential.value),
            None,
        )
        .await?;

        let response = CopilotUserResponse::parse(&body)?;
        debug!(
            plan = ?response.copilot_plan,
            used = ?response.limited_user_usage,
            resets = ?response.limited_user_reset_date,
            "Copilot usage"
        );
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
    fn test_limited_plan_counts_total_only() {
        let body = json!({
            "copilot_plan": "individual",
            "limited_user_usage": 42,
            "limited_user_reset_date": "2025-07-01",
            "chat_enabled": true
        });
        let batch = CopilotUserResponse::parse(&body).unwrap().into_batch(bounds());
        assert_eq!(batch.windows.total.request_count, 42);
        assert_eq!(batch.windows.this_month.request_count, 0);
        assert_eq!(batch.windows.total.total_tokens, None);
        assert!(batch.notes.is_empty());
    }

    #[test]
    fn test_paid_plan_notes_missing_counter() {
        let body = json!({"copilot_plan": "business"});
        let batch = CopilotUserResponse::parse(&body).unwrap().into_batch(bounds());
        assert_eq!(batch.events, 0);
        assert_eq!(batch.notes, vec!["business plan does not report request counts"]);
    }

    #[test]
    fn test_bad_shape_is_invalid_response() {
        let err = CopilotUserResponse::parse(&json!({"limited_user_usage": "many"})).unwrap_err();
        assert!(matches!(err, FetchError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_missing_token_never_calls_network() {
        let home = tempfile::TempDir::new().unwrap();
        let ctx = FetchContext::builder()
            .home(home.path())
            .env(Default::default())
            .build()
            .unwrap();
        let err = CopilotApiSource.read(&ctx).await.unwrap_err();
        assert_eq!(err.to_string(), "credential not set (GITHUB_TOKEN or GH_TOKEN)");
    }
}
