//! Cline and Roo Code task parsers.

use aiusage_core::{UsageEvent, Usd, time};
use aiusage_fetch::host::jsonl::u64_at;
use serde::Deserialize;
use serde_json::Value;

use crate::formats::{EventSink, FileMeta, Record};

/// Request counters shared by `ui_messages.json` payloads and `task.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequestInfo {
    /// Input tokens.
    pub tokens_in: Option<u64>,
    /// Output tokens.
    pub tokens_out: Option<u64>,
    /// Prompt-cache reads.
    pub cache_reads: Option<u64>,
    /// Prompt-cache writes.
    pub cache_writes: Option<u64>,
    /// Cost Cline recorded: `cost` per request, `totalCost` per task.
    #[serde(alias = "totalCost")]
    pub cost: Option<f64>,
}

impl ApiRequestInfo {
    fn event(&self, timestamp: Option<chrono::DateTime<chrono::Utc>>) -> Record {
        if self.tokens_in.is_none() && self.tokens_out.is_none() {
            return Record::Malformed;
        }
        let cached = match (self.cache_reads, self.cache_writes) {
            (None, None) => None,
            (r, w) => Some(r.unwrap_or(0).saturating_add(w.unwrap_or(0))),
        };
        Record::Event(
            UsageEvent::new(timestamp)
                .with_input(self.tokens_in)
                .with_output(self.tokens_out)
                .with_cached(cached)
                .with_cost(self.cost.and_then(Usd::from_dollars)),
        )
    }
}

/// Parses a task's `ui_messages.json` or `task.json`.
///
/// A `task.json` next to a `ui_messages.json` is skipped; the message log
/// has the same usage per request.
pub fn parse_task_file(value: &Value, meta: &FileMeta, sink: &mut EventSink) {
    let is_summary = meta.path.file_name().is_some_and(|n| n == "task.json");
    if is_summary {
        if meta.path.with_file_name("ui_messages.json").is_file() {
            return;
        }
        let Ok(info) = ApiRequestInfo::deserialize(value) else {
            sink.skip();
            return;
        };
        sink.apply(info.event(value.get("ts").and_then(time::from_value)));
        return;
    }

    let Some(messages) = value.as_array() else {
        sink.skip();
        return;
    };
    for message in messages {
        sink.apply(parse_ui_message(message));
    }
}

/// Parses one `ui_messages.json` entry.
pub fn parse_ui_message(message: &Value) -> Record {
    if message.get("say").and_then(Value::as_str) != Some("api_req_started") {
        return Record::Ignored;
    }
    let Some(text) = message.get("text").and_then(Value::as_str) else {
        return Record::Malformed;
    };
    let Ok(payload) = serde_json::from_str::<Value>(text) else {
        return Record::Malformed;
    };
    // Requests that were started but never answered have no counts yet.
    if payload.get("tokensIn").is_none() && payload.get("tokensOut").is_none() {
        return Record::Ignored;
    }
    let Ok(info) = ApiRequestInfo::deserialize(&payload) else {
        return Record::Malformed;
    };
    info.event(message.get("ts").and_then(time::from_value))
}

/// Parses Roo Code's lifetime totals. They have no timestamp.
pub fn parse_roo_totals(value: &Value, _meta: &FileMeta, sink: &mut EventSink) {
    let input = u64_at(value, "/totalInputTokens");
    let output = u64_at(value, "/totalOutputTokens");
    if input.is_none() && output.is_none() {
        sink.skip();
        return;
    }
    let cost = value
        .get("totalCost")
        .and_then(Value::as_f64)
        .and_then(Usd::from_dollars);
    let reads = u64_at(value, "/totalCacheReadTokens");
    let writes = u64_at(value, "/totalCacheWriteTokens");
    let cached = match (reads, writes) {
        (None, None) => None,
        (r, w) => Some(r.unwrap_or(0).saturating_add(w.unwrap_or(0))),
    };
    sink.push(
        UsageEvent::new(None)
            .with_input(input)
            .with_output(output)
            .with_cached(cached)
            .with_cost(cost)
            .with_requests(0),
    );
}

// ============================================================================
// Tests
// ============================================================================
