//! Claude Code transcript parser.

use aiusage_core::{UsageEvent, Usd, time};
use serde::Deserialize;
use serde_json::Value;

use crate::formats::{FileMeta, Record};

/// The usage block of an assistant message.
#[derive(Debug, Default, Deserialize)]
pub struct ClaudeUsage {
    /// Fresh input tokens.
    pub input_tokens: Option<u64>,
    /// Output tokens.
    pub output_tokens: Option<u64>,
    /// Tokens served from the prompt cache.
    pub cache_read_input_tokens: Option<u64>,
    /// Tokens written to the prompt cache.
    pub cache_creation_input_tokens: Option<u64>,
}

impl ClaudeUsage {
    fn cached(&self) -> Option<u64> {
        match (self.cache_read_input_tokens, self.cache_creation_input_tokens) {
            (None, None) => None,
            (read, write) => Some(read.unwrap_or(0).saturating_add(write.unwrap_or(0))),
        }
    }
}

/// Parses one transcript line.
///
/// Lines without `message.usage` (user turns, summaries) are ignored. A usage
/// block without input or output counts is malformed. `costUSD` is kept when
/// the line records one.
pub fn parse_transcript_line(value: &Value, _meta: &FileMeta) -> Record {
    let Some(usage) = value.pointer("/message/usage").filter(|u| !u.is_null()) else {
        return Record::Ignored;
    };
    let Ok(usage) = ClaudeUsage::deserialize(usage) else {
        return Record::Malformed;
    };
    if usage.input_tokens.is_none() && usage.output_tokens.is_none() {
        return Record::Malformed;
    }

    let timestamp = value.get("timestamp").and_then(time::from_value);
    let cost = value
        .get("costUSD")
        .and_then(Value::as_f64)
        .and_then(Usd::from_dollars);
    Record::Event(
        UsageEvent::new(timestamp)
            .with_input(usage.input_tokens)
            .with_output(usage.output_tokens)
            .with_cached(usage.cached())
            .with_cost(cost),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn meta() -> FileMeta {
        FileMeta {
            path: PathBuf::from("/tmp/session.jsonl"),
        }
    }

    #[test]
    fn test_assistant_line() {
        let line = json!({
            "type": "assistant",
            "timestamp": "2025-06-04T10:15:00.000Z",
            "message": {"usage": {
                "input_tokens": 12,
                "output_tokens": 340,
                "cache_read_input_tokens": 100,
                "cache_creation_input_tokens": 5
            }}
        });
        let Record::Event(event) = parse_transcript_line(&line, &meta()) else {
            panic!("expected event");
        };
        assert_eq!(event.input_tokens(), Some(12));
        assert_eq!(event.output_tokens(), Some(340));
        assert_eq!(event.cached_tokens(), Some(105));
        assert_eq!(event.total_tokens(), Some(352));
        assert!(event.timestamp().is_some());
    }

    #[test]
    fn test_user_line_ignored() {
        let line = json!({"type": "user", "message": {"role": "user", "content": "hi"}});
        assert_eq!(parse_transcript_line(&line, &meta()), Record::Ignored);
        assert_eq!(
            parse_transcript_line(&json!({"type": "summary"}), &meta()),
            Record::Ignored
        );
    }

    #[test]
    fn test_usage_without_counts_is_malformed() {
        let line = json!({"message": {"usage": {"service_tier": "standard"}}});
        assert_eq!(parse_transcript_line(&line, &meta()), Record::Malformed);
        let line = json!({"message": {"usage": {"input_tokens": "lots"}}});
        assert_eq!(parse_transcript_line(&line, &meta()), Record::Malformed);
    }

    #[test]
    fn test_missing_timestamp_is_untimed() {
        let line = json!({"message": {"usage": {"input_tokens": 1, "output_tokens": 2}}});
        let Record::Event(event) = parse_transcript_line(&line, &meta()) else {
            panic!("expected event");
        };
        assert!(event.timestamp().is_none());
        assert_eq!(event.cached_tokens(), None);
        assert_eq!(event.cost_usd(), None);
    }

    #[test]
    fn test_recorded_cost_is_kept() {
        let line = json!({
            "costUSD": 0.0123,
            "message": {"usage": {"input_tokens": 1, "output_tokens": 2}}
        });
        let Record::Event(event) = parse_transcript_line(&line, &meta()) else {
            panic!("expected event");
        };
        assert_eq!(event.cost_usd(), Some(Usd::from_micros(12_300)));
    }
}
