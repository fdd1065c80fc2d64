//! Gemini CLI session and telemetry parsers.

use aiusage_core::{UsageEvent, time};
use aiusage_fetch::host::jsonl::{first_u64, first_value};
use serde::Deserialize;
use serde_json::Value;

use crate::formats::{EventSink, FileMeta, Record};

/// Token counts of one model turn.
#[derive(Debug, Default, Deserialize)]
pub struct SessionTokens {
    /// Prompt tokens.
    pub input: Option<u64>,
    /// Candidate tokens.
    pub output: Option<u64>,
    /// Cached prompt tokens.
    pub cached: Option<u64>,
    /// Reported total (includes thoughts and tool tokens).
    pub total: Option<u64>,
}

/// Parses a `session-*.json` chat file.
///
/// Only `gemini` turns carry usage; user and info turns are ignored.
pub fn parse_session_file(value: &Value, _meta: &FileMeta, sink: &mut EventSink) {
    let Some(messages) = value.get("messages").and_then(Value::as_array) else {
        sink.skip();
        return;
    };
    for message in messages {
        sink.apply(session_message(message));
    }
}

fn session_message(message: &Value) -> Record {
    if message.get("type").and_then(Value::as_str) != Some("gemini") {
        return Record::Ignored;
    }
    let Some(tokens) = message.get("tokens").filter(|t| !t.is_null()) else {
        return Record::Ignored;
    };
    let Ok(tokens) = SessionTokens::deserialize(tokens) else {
        return Record::Malformed;
    };
    if tokens.input.is_none() && tokens.output.is_none() && tokens.total.is_none() {
        return Record::Malformed;
    }

    let timestamp = message.get("timestamp").and_then(time::from_value);
    Record::Event(
        UsageEvent::new(timestamp)
            .with_input(tokens.input)
            .with_output(tokens.output)
            .with_cached(tokens.cached)
            .with_total(tokens.total),
    )
}

/// Parses one telemetry record.
///
/// Records come either flat or as OpenTelemetry log records with the
/// counters under `attributes`. Records without token counters are other
/// telemetry and are ignored.
pub fn parse_telemetry_line(value: &Value, _meta: &FileMeta) -> Record {
    let input = first_u64(value, &["/input_token_count", "/attributes/input_token_count"]);
    let output = first_u64(value, &["/output_token_count", "/attributes/output_token_count"]);
    let total = first_u64(value, &["/total_token_count", "/attributes/total_token_count"]);
    let cached = first_u64(value, &["/cached_content_token_count", "/attributes/cached_content_token_count"]);
    if input.is_none() && output.is_none() && total.is_none() {
        return Record::Ignored;
    }

    let timestamp = first_value(value, &["/timestamp", "/attributes/event.timestamp"])
        .and_then(time::from_value);
    Record::Event(
        UsageEvent::new(timestamp)
            .with_input(input)
            .with_output(output)
            .with_cached(cached)
            .with_total(total),
    )
}
