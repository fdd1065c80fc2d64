//! Cascade log parser.
//!
//! Entries look like:
//!
//! ```json
//! {"timestamp": "2025-06-04T09:00:00Z",
//!  "usage": {"input_tokens": 300, "output_tokens": 150},
//!  "billable_tokens": 450}
//! ```
//!
//! Some builds use `context_length` / `completion_length` instead, either
//! inside `usage` or at the top level.

use aiusage_core::{UsageEvent, time};
use aiusage_fetch::host::jsonl;
use serde_json::Value;

use crate::formats::{EventSink, FileMeta, Record};

const INPUT: &[&str] = &["/usage/input_tokens", "/usage/context_length", "/context_length"];
const OUTPUT: &[&str] = &[
    "/usage/output_tokens",
    "/usage/completion_length",
    "/completion_length",
    "/generated_tokens",
];

/// Parses one Cascade entry.
///
/// Entries without any token field (status lines, tool calls) are ignored.
pub fn parse_cascade_line(value: &Value, _meta: &FileMeta) -> Record {
    if !value.is_object() {
        return Record::Malformed;
    }
    let input = jsonl::first_u64(value, INPUT);
    let output = jsonl::first_u64(value, OUTPUT);
    let billable = jsonl::u64_at(value, "/billable_tokens");
    if input.is_none() && output.is_none() && billable.is_none() {
        return Record::Ignored;
    }

    let timestamp = value.get("timestamp").and_then(time::from_value);
    Record::Event(
        UsageEvent::new(timestamp)
            .with_input(input)
            .with_output(output)
            .with_total(billable),
    )
}

/// Parses a `.json` Cascade file: one entry or an array of entries.
pub fn parse_cascade_document(value: &Value, meta: &FileMeta, sink: &mut EventSink) {
    match value {
        Value::Array(entries) => {
            for entry in entries {
                sink.apply(parse_cascade_line(entry, meta));
            }
        }
        Value::Object(_) => sink.apply(parse_cascade_line(value, meta)),
        _ => sink.skip(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiusage_core::PeriodBounds;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::path::PathBuf;

    fn meta() -> FileMeta {
        FileMeta {
            path: PathBuf::from("/tmp/cascade.jsonl"),
        }
    }

    #[test]
    fn test_usage_block() {
        let record = parse_cascade_line(
            &json!({"timestamp": 1_749_027_600_000_i64, "usage": {"input_tokens": 300, "output_tokens": 150}}),
            &meta(),
        );
        let Record::Event(event) = record else {
            panic!("expected event");
        };
        assert_eq!(event.total_tokens(), Some(450));
        assert_eq!(
            event.timestamp(),
            Some(Utc.with_ymd_and_hms(2025, 6, 4, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_alternate_field_names() {
        let record = parse_cascade_line(
            &json!({"context_length": 800, "generated_tokens": 40}),
            &meta(),
        );
        let Record::Event(event) = record else {
            panic!("expected event");
        };
        assert_eq!(event.input_tokens(), Some(800));
        assert_eq!(event.output_tokens(), Some(40));
        assert_eq!(event.timestamp(), None);
    }

    #[test]
    fn test_billable_total_is_verbatim() {
        let record = parse_cascade_line(
            &json!({"usage": {"input_tokens": 10, "output_tokens": 5}, "billable_tokens": 12}),
            &meta(),
        );
        let Record::Event(event) = record else {
            panic!("expected event");
        };
        assert_eq!(event.total_tokens(), Some(12));
    }

    #[test]
    fn test_entries_without_tokens_are_ignored() {
        assert_eq!(
            parse_cascade_line(&json!({"event": "tool_call"}), &meta()),
            Record::Ignored
        );
        assert_eq!(parse_cascade_line(&json!([1, 2]), &meta()), Record::Malformed);
    }

    #[test]
    fn test_document_array() {
        let now = Utc.with_ymd_and_hms(2025, 6, 4, 12, 0, 0).unwrap();
        let mut sink = EventSink::new(PeriodBounds::at(&now).unwrap());
        parse_cascade_document(
            &json!([{"usage": {"input_tokens": 1}}, {"status": "ok"}, "junk"]),
            &meta(),
            &mut sink,
        );
        assert_eq!(sink.event_count(), 1);
        assert_eq!(sink.skipped(), 1);
    }
}
