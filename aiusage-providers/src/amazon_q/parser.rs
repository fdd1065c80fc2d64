//! Amazon Q developer log parser.

use std::sync::LazyLock;

use aiusage_core::{UsageEvent, time};
use aiusage_fetch::host::jsonl::u64_at;
use regex::Regex;
use serde_json::Value;

use crate::formats::{FileMeta, Record};

static INPUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\binput_tokens?[:\s=]+(\d+)").expect("Invalid regex"));

static OUTPUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\boutput_tokens?[:\s=]+(\d+)").expect("Invalid regex"));

// `\b` does not match inside `input_tokens`, so this only sees bare counts.
static TOKENS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\btokens?[:\s=]+(\d+)").expect("Invalid regex"));

static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{4}-\d{2}-\d{2}[T\s]\d{2}:\d{2}:\d{2}").expect("Invalid regex")
});

fn capture(re: &Regex, line: &str) -> Option<u64> {
    re.captures(line)?.get(1)?.as_str().parse().ok()
}

/// Parses one log line, JSON or text.
///
/// A bare `tokens` count is kept as a total; it is never split into input
/// and output. Lines without a timestamp stay undated.
pub fn parse_log_line(line: &str, _meta: &FileMeta) -> Record {
    if line.starts_with('{') {
        if let Ok(value) = serde_json::from_str::<Value>(line) {
            return json_entry(&value);
        }
    }
    text_entry(line)
}

fn json_entry(value: &Value) -> Record {
    let input = u64_at(value, "/input_tokens");
    let output = u64_at(value, "/output_tokens");
    let tokens = u64_at(value, "/tokens");
    if input.is_none() && output.is_none() && tokens.is_none() {
        return Record::Ignored;
    }

    let timestamp = value.get("timestamp").and_then(time::from_value);
    Record::Event(split_or_total(UsageEvent::new(timestamp), input, output, tokens))
}

fn text_entry(line: &str) -> Record {
    let input = capture(&INPUT_RE, line);
    let output = capture(&OUTPUT_RE, line);
    let tokens = capture(&TOKENS_RE, line);
    if input.is_none() && output.is_none() && tokens.is_none() {
        return Record::Ignored;
    }

    let timestamp = TIMESTAMP_RE
        .find(line)
        .and_then(|m| time::from_str(m.as_str()));
    Record::Event(split_or_total(UsageEvent::new(timestamp), input, output, tokens))
}

fn split_or_total(
    event: UsageEvent,
    input: Option<u64>,
    output: Option<u64>,
    tokens: Option<u64>,
) -> UsageEvent {
    if input.is_some() || output.is_some() {
        event.with_input(input).with_output(output)
    } else {
        event.with_total(tokens)
    }
}
