//! Cody chat history parser.

use aiusage_core::{UsageEvent, time};
use aiusage_fetch::host::jsonl::u64_at;
use serde_json::Value;

use crate::formats::{EventSink, FileMeta, Record};

/// Parses one history file into a single event.
///
/// The event is stamped with the newest message timestamp, or left undated
/// when no message has one.
pub fn parse_chat_history(value: &Value, _meta: &FileMeta, sink: &mut EventSink) {
    if !value.is_object() {
        sink.skip();
        return;
    }
    sink.apply(history_event(value));
}

fn history_event(value: &Value) -> Record {
    let messages = value
        .get("messages")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let requests = messages
        .iter()
        .filter(|m| m.get("role").and_then(Value::as_str) == Some("assistant"))
        .count() as u64;
    let input = u64_at(value, "/tokenCount/input");
    let output = u64_at(value, "/tokenCount/output");
    if requests == 0 && input.is_none() && output.is_none() {
        return Record::Ignored;
    }

    let timestamp = messages
        .iter()
        .filter_map(|m| m.get("timestamp").and_then(time::from_value))
        .max();
    Record::Event(
        UsageEvent::new(timestamp)
            .with_input(input)
            .with_output(output)
            .with_requests(requests),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiusage_core::PeriodBounds;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;
    use std::path::Path;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 4, 12, 0, 0).unwrap()
    }

    fn parse(value: &Value) -> aiusage_fetch::SourceBatch {
        let meta = FileMeta::of(Path::new("/tmp/chat.json"));
        let mut sink = EventSink::new(PeriodBounds::at(&now()).unwrap());
        parse_chat_history(value, &meta, &mut sink);
        sink.into_batch("cody")
    }

    #[test]
    fn test_requests_without_tokens() {
        let batch = parse(&json!({"messages": [
            {"role": "user", "timestamp": 1_749_027_000_000_i64},
            {"role": "assistant", "timestamp": 1_749_027_600_000_i64},
            {"role": "assistant"}
        ]}));
        let today = batch.windows.today;
        assert_eq!(today.request_count, 2);
        assert_eq!(today.total_tokens, None);
    }

    #[test]
    fn test_undated_history_counts_toward_total_only() {
        let batch = parse(&json!({
            "messages": [{"role": "assistant"}],
            "tokenCount": {"input": 120, "output": 80}
        }));
        assert_eq!(batch.windows.total.total_tokens, Some(200));
        assert_eq!(batch.windows.total.request_count, 1);
        assert!(batch.windows.today.is_empty());
    }

    #[test]
    fn test_settings_files_are_ignored() {
        let batch = parse(&json!({"theme": "dark"}));
        assert_eq!(batch.events, 0);
        assert_eq!(batch.skipped, 0);

        let batch = parse(&json!([1, 2]));
        assert_eq!(batch.skipped, 1);
    }
}
