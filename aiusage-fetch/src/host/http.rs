//! HTTP client with tracing, a domain allowlist, and error classification.
//!
//! Remote usage endpoints are queried once per invocation. There is no
//! retry: a failed call is reported as-is so the numbers are never stale.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, header};
use tracing::{debug, instrument};
use url::Url;

use crate::context::DEFAULT_REMOTE_TIMEOUT_SECS;
use crate::error::{FetchError, HttpError};

/// User agent string for aiusage.
const USER_AGENT: &str = concat!("aiusage/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper with tracing and a domain allowlist.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    timeout: Duration,
    allowed_domains: Option<Vec<String>>,
}

impl HttpClient {
    /// Creates a builder.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// The request timeout this client enforces.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &str) -> Result<(), HttpError> {
        let parsed = Url::parse(url).map_err(|e| HttpError::InvalidUrl(e.to_string()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| HttpError::InvalidUrl("no host in URL".to_string()))?;

        let Some(ref allowed) = self.allowed_domains else {
            return Ok(());
        };

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(HttpError::DomainNotAllowed(host.to_string()))
        }
    }

    /// Performs a GET request with an authorization header.
    #[instrument(skip(self, auth_header), fields(url = %url))]
    pub async fn get_with_auth(&self, url: &str, auth_header: &str) -> Result<Response, FetchError> {
        self.is_domain_allowed(url)?;
        debug!("GET request with auth");

        let response = self
            .inner
            .get(url)
            .header(header::AUTHORIZATION, auth_header)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.classify(&e))?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Maps a transport error onto the fetch taxonomy.
    pub fn classify(&self, err: &reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else if err.is_connect() || err.is_request() {
            FetchError::NetworkFailure(err.to_string())
        } else if err.is_decode() {
            FetchError::InvalidResponse(err.to_string())
        } else {
            FetchError::Http(err.to_string())
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`HttpClient`].
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    timeout: Option<Duration>,
    allowed_domains: Vec<String>,
}

impl HttpClientBuilder {
    /// Sets the request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds a domain to the allowlist. Subdomains are allowed too.
    #[must_use]
    pub fn allowed_domain(mut self, domain: impl Into<String>) -> Self {
        self.allowed_domains.push(domain.into());
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<HttpClient, FetchError> {
        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_REMOTE_TIMEOUT_SECS));
        let inner = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;

        Ok(HttpClient {
            inner,
            timeout,
            allowed_domains: (!self.allowed_domains.is_empty()).then_some(self.allowed_domains),
        })
    }
}

// ============================================================================
// Response Handling
// ============================================================================

/// Extension trait for Response handling.
pub trait ResponseExt {
    /// Get the Retry-After header value in seconds.
    fn retry_after_secs(&self) -> Option<u64>;
}

impl ResponseExt for Response {
    fn retry_after_secs(&self) -> Option<u64> {
        self.headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    }
}

/// Maps a non-success status to an error with a per-status message.
///
/// Returns `None` for 2xx.
pub fn status_error(status: StatusCode, retry_after: Option<u64>) -> Option<FetchError> {
    if status.is_success() {
        return None;
    }
    Some(match status {
        StatusCode::UNAUTHORIZED => FetchError::AuthFailure("invalid or expired credential".into()),
        StatusCode::FORBIDDEN => {
            FetchError::AuthFailure("credential lacks permission for usage data".into())
        }
        StatusCode::NOT_FOUND => {
            FetchError::InvalidResponse("endpoint not found for this account type".into())
        }
        StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited { retry_after },
        other => FetchError::Http(format!("unexpected status {other}")),
    })
}

/// Checks a response and reads its JSON body.
pub async fn json_body(response: Response, client: &HttpClient) -> Result<serde_json::Value, FetchError> {
    if let Some(err) = status_error(response.status(), response.retry_after_secs()) {
        return Err(err);
    }
    let text = response.text().await.map_err(|e| client.classify(&e))?;
    serde_json::from_str(&text)
        .map_err(|e| FetchError::InvalidResponse(format!("parse failure: {e}")))
}

impl From<HttpError> for FetchError {
    fn from(err: HttpError) -> Self {
        FetchError::Http(err.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_allowlist() {
        let client = HttpClient::builder()
            .allowed_domain("api.github.com")
            .allowed_domain("openai.com")
            .build()
            .unwrap();

        assert!(client.is_domain_allowed("https://api.github.com/copilot_internal/user").is_ok());
        assert!(client.is_domain_allowed("https://api.openai.com/v1/organization/usage").is_ok());
        assert!(client.is_domain_allowed("https://evil.com/steal").is_err());
    }

    #[test]
    fn test_no_domain_restrictions() {
        let client = HttpClient::builder().build().unwrap();
        assert!(client.is_domain_allowed("https://any.domain.com").is_ok());
    }

    #[test]
    fn test_invalid_url() {
        let client = HttpClient::builder().allowed_domain("example.com").build().unwrap();
        assert!(client.is_domain_allowed("not-a-valid-url").is_err());
    }

    #[test]
    fn test_builder_timeout() {
        let client = HttpClient::builder()
            .timeout(Duration::from_secs(3))
            .build()
            .unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_status_errors() {
        assert!(status_error(StatusCode::OK, None).is_none());
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, None),
            Some(FetchError::AuthFailure(_))
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, Some(9)),
            Some(FetchError::RateLimited { retry_after: Some(9) })
        ));
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, None),
            Some(FetchError::Http(_))
        ));
    }
}
