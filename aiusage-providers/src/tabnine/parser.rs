//! Tabnine completion log parser.

use aiusage_core::{UsageEvent, time};
use aiusage_fetch::host::jsonl::u64_at;
use serde_json::Value;

use crate::formats::{FileMeta, Record};

/// Parses one JSON log line.
///
/// `meta.tokens_used` and `usage.tokens` both count generated tokens; when
/// both are present the larger wins. Character counts are not converted.
pub fn parse_completion_line(value: &Value, _meta: &FileMeta) -> Record {
    let output = match (
        u64_at(value, "/meta/tokens_used"),
        u64_at(value, "/usage/tokens"),
    ) {
        (None, None) => return Record::Ignored,
        (a, b) => a.max(b),
    };

    let timestamp = value.get("timestamp").and_then(time::from_value);
    Record::Event(UsageEvent::new(timestamp).with_output(output))
}
