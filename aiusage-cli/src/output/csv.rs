//! CSV output formatting.
//!
//! One row per tool and period. Null token and cost fields are empty cells,
//! so a spreadsheet never reads a missing value as zero.

use std::fmt::Write;

use aiusage_core::{AggregateReport, Period, ProviderReport};

const HEADER: &str = "tool,display_name,status,period,input_tokens,output_tokens,cached_tokens,total_tokens,request_count,cost_usd,source,diagnostic";

/// CSV formatter.
pub struct CsvFormatter;

impl CsvFormatter {
    /// Formats a usage report.
    pub fn format_report(report: &AggregateReport) -> String {
        let mut out = String::from(HEADER);
        out.push('\n');
        for row in &report.providers {
            for &period in Period::all() {
                Self::push_row(&mut out, row, period);
            }
        }
        out
    }

    fn push_row(out: &mut String, row: &ProviderReport, period: Period) {
        let window = row.usage.get(period);
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{},{}",
            row.provider.cli_name(),
            escape(&row.display_name),
            row.status.key(),
            period.key(),
            optional(window.input_tokens),
            optional(window.output_tokens),
            optional(window.cached_tokens),
            optional(window.total_tokens),
            window.request_count,
            optional(window.cost_usd),
            escape(row.source.as_deref().unwrap_or_default()),
            escape(row.diagnostic.as_deref().unwrap_or_default()),
        );
    }
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Quotes a field when it contains a delimiter, quote, or newline.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a, b"), "\"a, b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_optional_is_empty_for_null() {
        assert_eq!(optional::<u64>(None), "");
        assert_eq!(optional(Some(0)), "0");
        assert_eq!(optional(Some(aiusage_core::Usd::from_micros(250_000))), "0.25");
    }
}
