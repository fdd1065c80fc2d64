//! Remote API family helpers.
//!
//! Remote sources resolve a credential, make one authenticated GET, and
//! parse the JSON body. Missing credentials never reach the network.

use aiusage_core::ProviderId;
use aiusage_fetch::host::http::{ResponseExt, json_body, status_error};
use aiusage_fetch::{Credential, FetchContext, FetchError, HttpClient};
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

/// Resolves a credential from the environment or fails with the variables to set.
pub fn require_credential(
    ctx: &FetchContext,
    id: ProviderId,
    env_vars: &[&str],
) -> Result<Credential, FetchError> {
    ctx.credential(id, env_vars).ok_or_else(|| {
        FetchError::CredentialMissing(ctx.credential_vars(id, env_vars).join(" or "))
    })
}

/// Maps provider-specific statuses before the generic mapping applies.
pub type StatusOverride = fn(StatusCode) -> Option<FetchError>;

/// Performs an authenticated GET and parses the JSON body.
pub async fn get_json(
    client: &HttpClient,
    url: &str,
    auth_header: &str,
    overrides: Option<StatusOverride>,
) -> Result<Value, FetchError> {
    let response = client.get_with_auth(url, auth_header).await?;
    let status = response.status();
    debug!(%status, "Usage endpoint answered");

    if !status.is_success() {
        if let Some(err) = overrides.and_then(|f| f(status)) {
            return Err(err);
        }
        if let Some(err) = status_error(status, response.retry_after_secs()) {
            return Err(err);
        }
    }
    json_body(response, client).await
}
