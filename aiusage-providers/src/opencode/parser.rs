//! OpenCode message parser.

use aiusage_core::{UsageEvent, time};
use aiusage_fetch::host::jsonl::first_value;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::formats::{EventSink, FileMeta, Record};

/// The `tokens` block of a current-format message.
#[derive(Debug, Default, Deserialize)]
pub struct MessageTokens {
    /// Prompt tokens.
    pub input: Option<u64>,
    /// Completion tokens.
    pub output: Option<u64>,
    /// Reasoning tokens, billed as output.
    pub reasoning: Option<u64>,
    /// Prompt cache activity.
    #[serde(default)]
    pub cache: CacheTokens,
}

/// Prompt cache counters.
#[derive(Debug, Default, Deserialize)]
pub struct CacheTokens {
    /// Tokens read from the cache.
    pub read: Option<u64>,
    /// Tokens written to the cache.
    pub write: Option<u64>,
}

/// The `usage` block of a legacy session or message.
#[derive(Debug, Default, Deserialize)]
struct LegacyUsage {
    input_tokens: Option<u64>,
    output_tokens: Option<u64>,
    reasoning_tokens: Option<u64>,
}

fn add(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (None, None) => None,
        (a, b) => Some(a.unwrap_or(0).saturating_add(b.unwrap_or(0))),
    }
}

fn is_zero(event: &UsageEvent) -> bool {
    event.input_tokens().unwrap_or(0) == 0 && event.output_tokens().unwrap_or(0) == 0
}

/// Parses one file from the message store.
///
/// A file is either a single message with `tokens`, or a legacy session.
/// Messages without a timestamp fall back to the session's.
pub fn parse_message_file(value: &Value, _meta: &FileMeta, sink: &mut EventSink) {
    if !value.is_object() {
        sink.skip();
        return;
    }

    if let Some(tokens) = value.get("tokens").filter(|t| !t.is_null()) {
        sink.apply(current_message(value, tokens));
        return;
    }

    let session_time = first_value(value, &["/created_at", "/updated_at"])
        .and_then(time::from_value);

    let messages: Vec<&Value> = value
        .get("messages")
        .and_then(Value::as_array)
        .map(|m| m.iter().filter(|m| m.get("usage").is_some_and(|u| !u.is_null())).collect())
        .unwrap_or_default();

    if messages.is_empty() {
        // Session summary only
        if let Some(usage) = value.get("usage").filter(|u| !u.is_null()) {
            sink.apply(legacy_usage(usage, session_time, 1));
        }
        return;
    }

    for message in messages {
        let timestamp = first_value(message, &["/timestamp", "/created_at"])
            .and_then(time::from_value)
            .or(session_time);
        let requests = u64::from(message.get("role").and_then(Value::as_str) == Some("assistant"));
        sink.apply(legacy_usage(&message["usage"], timestamp, requests));
    }
}

fn current_message(value: &Value, tokens: &Value) -> Record {
    let Ok(tokens) = MessageTokens::deserialize(tokens) else {
        return Record::Malformed;
    };
    let timestamp = value
        .pointer("/time/created")
        .and_then(time::from_value);

    let event = UsageEvent::new(timestamp)
        .with_input(tokens.input)
        .with_output(add(tokens.output, tokens.reasoning))
        .with_cached(add(tokens.cache.read, tokens.cache.write));
    if is_zero(&event) {
        return Record::Ignored;
    }
    Record::Event(event)
}

fn legacy_usage(usage: &Value, timestamp: Option<DateTime<Utc>>, requests: u64) -> Record {
    let Ok(usage) = LegacyUsage::deserialize(usage) else {
        return Record::Malformed;
    };
    let event = UsageEvent::new(timestamp)
        .with_input(usage.input_tokens)
        .with_output(add(usage.output_tokens, usage.reasoning_tokens))
        .with_requests(requests);
    if is_zero(&event) {
        return Record::Ignored;
    }
    Record::Event(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiusage_core::PeriodBounds;
    use chrono::TimeZone;
    use serde_json::json;
    use std::path::Path;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 4, 12, 0, 0).unwrap()
    }

    fn parse(value: &Value) -> aiusage_fetch::SourceBatch {
        let mut sink = EventSink::new(PeriodBounds::at(&now()).unwrap());
        parse_message_file(value, &FileMeta::of(Path::new("/tmp/msg_01.json")), &mut sink);
        sink.into_batch("opencode")
    }

    #[test]
    fn test_current_message() {
        let batch = parse(&json!({
            "role": "assistant",
            "time": {"created": 1_749_031_200_000_i64},
            "tokens": {"input": 100, "output": 40, "reasoning": 10, "cache": {"read": 500, "write": 20}}
        }));
        let today = batch.windows.today;
        assert_eq!(today.input_tokens, Some(100));
        assert_eq!(today.output_tokens, Some(50));
        assert_eq!(today.cached_tokens, Some(520));
        assert_eq!(today.total_tokens, Some(150));
        assert_eq!(today.request_count, 1);
    }

    #[test]
    fn test_user_and_pending_messages_ignored() {
        let user = parse(&json!({"role": "user", "time": {"created": 1}}));
        assert_eq!(user.events, 0);
        assert_eq!(user.skipped, 0);

        let pending = parse(&json!({"tokens": {"input": 0, "output": 0}}));
        assert_eq!(pending.events, 0);
    }

    #[test]
    fn test_undated_message_counts_toward_total_only() {
        let batch = parse(&json!({"tokens": {"input": 7, "output": 3}}));
        assert_eq!(batch.windows.total.total_tokens, Some(10));
        assert!(batch.windows.today.is_empty());
    }

    #[test]
    fn test_legacy_session_prefers_messages() {
        let batch = parse(&json!({
            "created_at": "2025-06-04T08:00:00Z",
            "usage": {"input_tokens": 999, "output_tokens": 999},
            "messages": [
                {"role": "user", "usage": {"input_tokens": 10}},
                {"role": "assistant", "usage": {"input_tokens": 20, "output_tokens": 5, "reasoning_tokens": 5}}
            ]
        }));
        assert_eq!(batch.windows.today.input_tokens, Some(30));
        assert_eq!(batch.windows.today.output_tokens, Some(10));
        assert_eq!(batch.windows.today.request_count, 1);
    }

    #[test]
    fn test_legacy_session_summary() {
        let batch = parse(&json!({"usage": {"input_tokens": 12, "output_tokens": 8}}));
        assert_eq!(batch.windows.total.total_tokens, Some(20));
        assert!(batch.windows.today.is_empty());
    }
}
