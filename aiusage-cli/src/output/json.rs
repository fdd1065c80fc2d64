//! JSON output formatting.

use aiusage_core::{AggregateReport, UsageWindows};
use anyhow::Result;
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// The usage report plus the sum over active tools.
#[derive(Debug, Serialize)]
pub struct ReportOutput<'a> {
    #[serde(flatten)]
    pub report: &'a AggregateReport,
    pub combined: UsageWindows,
}

impl<'a> ReportOutput<'a> {
    /// Wraps a report.
    pub fn new(report: &'a AggregateReport) -> Self {
        Self {
            report,
            combined: report.combined(),
        }
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a usage report.
    pub fn format_report(&self, report: &AggregateReport) -> Result<String> {
        self.format(&ReportOutput::new(report))
    }
}
