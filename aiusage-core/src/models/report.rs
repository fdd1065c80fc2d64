//! Provider reports and the aggregate report.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::provider::{Capability, ProviderId};
use super::window::UsageWindows;

// ============================================================================
// Report Status
// ============================================================================

/// Terminal classification of one provider for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// The source was located and read (zero usage is still active).
    Active,
    /// Tool not installed, credential not set, or data not decodable.
    Unavailable,
    /// Structurally unsupported, e.g. a web-dashboard-only tool.
    NotApplicable,
    /// A readable source failed unexpectedly.
    Error,
}

impl ReportStatus {
    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Unavailable => "Unavailable",
            Self::NotApplicable => "N/A",
            Self::Error => "Error",
        }
    }

    /// Returns the machine key (matches the serialized form).
    pub fn key(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Unavailable => "unavailable",
            Self::NotApplicable => "not_applicable",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ============================================================================
// Provider Report
// ============================================================================

/// One provider's row in the aggregate report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderReport {
    /// Which provider this row describes.
    pub provider: ProviderId,
    /// Display name.
    pub display_name: String,
    /// What the provider is able to measure.
    pub capability: Capability,
    /// Terminal status for this run.
    pub status: ReportStatus,
    /// Usage windows (default/null for non-active rows).
    pub usage: UsageWindows,
    /// The resolved data source path or endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Why the provider is degraded, or notes about skipped data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    /// Records that were malformed or missing required fields.
    #[serde(default)]
    pub skipped_records: u64,
}

impl ProviderReport {
    fn base(provider: ProviderId, capability: Capability, status: ReportStatus) -> Self {
        Self {
            provider,
            display_name: provider.display_name().to_string(),
            capability,
            status,
            usage: UsageWindows::default(),
            source: None,
            diagnostic: None,
            skipped_records: 0,
        }
    }

    /// Creates an active row.
    ///
    /// Providers that claim token capability report empty windows as zero.
    pub fn active(provider: ProviderId, capability: Capability, usage: UsageWindows) -> Self {
        let usage = if capability.reports_tokens() {
            usage.with_empty_as_zero()
        } else {
            usage
        };
        Self {
            usage,
            ..Self::base(provider, capability, ReportStatus::Active)
        }
    }

    /// Creates an unavailable row.
    pub fn unavailable(
        provider: ProviderId,
        capability: Capability,
        diagnostic: impl Into<String>,
    ) -> Self {
        Self {
            diagnostic: Some(diagnostic.into()),
            ..Self::base(provider, capability, ReportStatus::Unavailable)
        }
    }

    /// Creates a not-applicable row.
    pub fn not_applicable(
        provider: ProviderId,
        capability: Capability,
        diagnostic: impl Into<String>,
    ) -> Self {
        Self {
            diagnostic: Some(diagnostic.into()),
            ..Self::base(provider, capability, ReportStatus::NotApplicable)
        }
    }

    /// Creates an error row.
    pub fn error(provider: ProviderId, capability: Capability, diagnostic: impl Into<String>) -> Self {
        Self {
            diagnostic: Some(diagnostic.into()),
            ..Self::base(provider, capability, ReportStatus::Error)
        }
    }

    /// Sets the resolved source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the diagnostic message.
    #[must_use]
    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }

    /// Sets the skipped record count.
    #[must_use]
    pub fn with_skipped(mut self, skipped: u64) -> Self {
        self.skipped_records = skipped;
        self
    }

    /// Returns true if this row carries usage.
    pub fn is_active(&self) -> bool {
        self.status == ReportStatus::Active
    }
}

// ============================================================================
// Aggregate Report
// ============================================================================

/// All provider rows for one invocation, in registry order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateReport {
    /// The reference "now" the windows were computed against.
    pub generated_at: DateTime<Utc>,
    /// One row per provider, in registry order.
    pub providers: Vec<ProviderReport>,
}

impl AggregateReport {
    /// Creates a report, ordering rows by registry position.
    pub fn new(generated_at: DateTime<Utc>, mut providers: Vec<ProviderReport>) -> Self {
        providers.sort_by_key(|r| r.provider.to_index());
        Self {
            generated_at,
            providers,
        }
    }

    /// Returns the row for a provider.
    pub fn get(&self, provider: ProviderId) -> Option<&ProviderReport> {
        self.providers.iter().find(|r| r.provider == provider)
    }

    /// Returns the number of rows with the given status.
    pub fn count(&self, status: ReportStatus) -> usize {
        self.providers.iter().filter(|r| r.status == status).count()
    }

    /// Sums the windows of every active row.
    pub fn combined(&self) -> UsageWindows {
        let mut combined = UsageWindows::default();
        for row in self.providers.iter().filter(|r| r.is_active()) {
            combined.merge(&row.usage);
        }
        combined
    }

    /// Returns true if no provider produced usage.
    pub fn is_empty(&self) -> bool {
        self.count(ReportStatus::Active) == 0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{UsageEvent, UsageWindow};
    use chrono::TimeZone;

    #[test]
    fn test_active_token_provider_zero_fills() {
        let report =
            ProviderReport::active(ProviderId::ClaudeCode, Capability::Tokens, UsageWindows::default());
        assert_eq!(report.usage.today, UsageWindow::zero());
        assert_eq!(report.status, ReportStatus::Active);
    }

    #[test]
    fn test_active_requests_provider_keeps_nulls() {
        let mut usage = UsageWindows::default();
        usage.total.add_event(&UsageEvent::new(None).with_requests(12));
        let report = ProviderReport::active(ProviderId::GithubCopilot, Capability::RequestsOnly, usage);
        assert_eq!(report.usage.total.input_tokens, None);
        assert_eq!(report.usage.total.request_count, 12);
        assert_eq!(report.usage.today.total_tokens, None);
    }

    #[test]
    fn test_unavailable_row_has_null_windows() {
        let report = ProviderReport::unavailable(ProviderId::Cursor, Capability::Tokens, "missing")
            .with_source("/tmp/state.vscdb");
        assert_eq!(report.usage, UsageWindows::default());
        assert_eq!(report.diagnostic.as_deref(), Some("missing"));
        assert_eq!(report.source.as_deref(), Some("/tmp/state.vscdb"));
    }

    #[test]
    fn test_aggregate_orders_by_registry() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let report = AggregateReport::new(
            now,
            vec![
                ProviderReport::not_applicable(ProviderId::Replit, Capability::LinkOnly, "link"),
                ProviderReport::active(ProviderId::ClaudeCode, Capability::Tokens, UsageWindows::default()),
            ],
        );
        assert_eq!(report.providers[0].provider, ProviderId::ClaudeCode);
        assert_eq!(report.providers[1].provider, ProviderId::Replit);
        assert_eq!(report.count(ReportStatus::Active), 1);
    }

    #[test]
    fn test_combined_ignores_inactive_rows() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut usage = UsageWindows::default();
        usage.total.add_event(&UsageEvent::new(None).with_input(Some(5)).with_output(Some(5)));
        let report = AggregateReport::new(
            now,
            vec![
                ProviderReport::active(ProviderId::Cline, Capability::Tokens, usage),
                ProviderReport::error(ProviderId::Warp, Capability::TotalTokens, "boom"),
            ],
        );
        assert_eq!(report.combined().total.total_tokens, Some(10));
    }
}
