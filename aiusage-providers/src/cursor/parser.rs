//! Cursor state database reader.

use aiusage_core::{UsageEvent, time};
use aiusage_fetch::host::jsonl::u64_at;
use aiusage_fetch::{FetchError, SqliteSnapshot};
use serde_json::Value;
use tracing::debug;

use crate::formats::database::{column_text, json_values};
use crate::formats::{EventSink, Record};

const DISK_KV: &str = "cursorDiskKV";
const ITEM_TABLE: &str = "ItemTable";

/// Reads one `state.vscdb` snapshot.
///
/// Token events come from `cursorDiskKV`; `ItemTable` chat history is used
/// for request counts only when the database has no token data.
pub fn read_state_db(db: &SqliteSnapshot, sink: &mut EventSink) -> Result<(), FetchError> {
    let has_kv = db.table_exists(DISK_KV)?;
    let has_items = db.table_exists(ITEM_TABLE)?;
    if !has_kv && !has_items {
        sink.note(format!(
            "neither {DISK_KV} nor {ITEM_TABLE} in {}",
            db.source().display()
        ));
        return Ok(());
    }

    let before = sink.event_count();
    if has_kv {
        for pattern in ["composerData:%", "bubbleId:%"] {
            for value in json_values(db, DISK_KV, pattern, sink)? {
                sink.apply(token_entry(&value));
            }
        }
    }

    if has_items && sink.event_count() == before {
        let requests = item_table_requests(db)?;
        debug!(db = %db.source().display(), requests, "Using ItemTable request counts");
        if requests > 0 {
            sink.push(UsageEvent::new(None).with_requests(requests));
        }
    }
    Ok(())
}

/// Turns a composer or bubble entry into an event.
///
/// Entries without a `tokenCount`, or with both counts at zero (user turns,
/// unfinished responses), carry no usage.
pub fn token_entry(value: &Value) -> Record {
    let Some(count) = value.get("tokenCount").filter(|v| v.is_object()) else {
        return Record::Ignored;
    };
    let input = u64_at(count, "/inputTokens");
    let output = u64_at(count, "/outputTokens");
    if input.unwrap_or(0) == 0 && output.unwrap_or(0) == 0 {
        return Record::Ignored;
    }

    let timestamp = ["createdAt", "updatedAt", "timestamp"]
        .iter()
        .find_map(|k| value.get(*k).and_then(time::from_value));
    Record::Event(UsageEvent::new(timestamp).with_input(input).with_output(output))
}

/// Counts assistant messages in legacy chat entries.
fn item_table_requests(db: &SqliteSnapshot) -> Result<u64, FetchError> {
    let mut stmt = db.conn().prepare(
        "SELECT value FROM ItemTable \
         WHERE key LIKE '%aichat%' OR key LIKE '%composer%' OR key LIKE '%chat%'",
    )?;
    let texts = stmt
        .query_map([], |row| column_text(row, 0))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut requests = 0u64;
    for text in texts.into_iter().flatten() {
        let Ok(value) = serde_json::from_str::<Value>(&text) else {
            continue;
        };
        requests += assistant_messages(&value);
    }
    Ok(requests)
}

fn assistant_messages(value: &Value) -> u64 {
    let mut count = 0;
    if let Some(messages) = value.get("messages").and_then(Value::as_array) {
        count += messages
            .iter()
            .filter(|m| m.get("role").and_then(Value::as_str) == Some("assistant"))
            .count() as u64;
    }
    if let Some(tabs) = value.get("tabs").and_then(Value::as_array) {
        count += tabs.iter().map(assistant_messages).sum::<u64>();
    }
    count
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use aiusage_core::PeriodBounds;
    use chrono::{TimeZone, Utc};
    use rusqlite::Connection;
    use serde_json::json;
    use tempfile::TempDir;

    fn sink() -> EventSink {
        let now = Utc.with_ymd_and_hms(2025, 6, 4, 12, 0, 0).unwrap();
        EventSink::new(PeriodBounds::at(&now).unwrap())
    }

    #[test]
    fn test_token_entry() {
        let bubble = json!({
            "tokenCount": {"inputTokens": 1200, "outputTokens": 300},
            "createdAt": 1_749_031_200_000_i64
        });
        let Record::Event(event) = token_entry(&bubble) else {
            panic!("expected event");
        };
        assert_eq!(event.total_tokens(), Some(1500));
        assert!(event.timestamp().is_some());

        let user_turn = json!({"tokenCount": {"inputTokens": 0, "outputTokens": 0}});
        assert_eq!(token_entry(&user_turn), Record::Ignored);
        assert_eq!(token_entry(&json!({"text": "hi"})), Record::Ignored);
    }

    #[test]
    fn test_reads_disk_kv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.vscdb");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            r#"CREATE TABLE cursorDiskKV (key TEXT UNIQUE ON CONFLICT REPLACE, value BLOB);
               INSERT INTO cursorDiskKV VALUES
                 ('bubbleId:c1:b1', '{"tokenCount":{"inputTokens":100,"outputTokens":50},"createdAt":"2025-06-04T09:00:00Z"}'),
                 ('bubbleId:c1:b2', '{"tokenCount":{"inputTokens":0,"outputTokens":0}}'),
                 ('bubbleId:c1:b3', 'not json'),
                 ('composerData:c1', '{"composerId":"c1"}');"#,
        )
        .unwrap();
        drop(conn);

        let db = SqliteSnapshot::open(&path).unwrap();
        let mut sink = sink();
        read_state_db(&db, &mut sink).unwrap();
        let batch = sink.into_batch("x");
        assert_eq!(batch.events, 1);
        assert_eq!(batch.skipped, 1);
        assert_eq!(batch.windows.today.input_tokens, Some(100));
    }

    #[test]
    fn test_item_table_fallback_counts_requests() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.vscdb");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            r#"CREATE TABLE ItemTable (key TEXT UNIQUE ON CONFLICT REPLACE, value BLOB);
               INSERT INTO ItemTable VALUES
                 ('workbench.panel.aichat.view.aichat.chatdata',
                  '{"tabs":[{"messages":[{"role":"user"},{"role":"assistant"},{"role":"assistant"}]}]}');"#,
        )
        .unwrap();
        drop(conn);

        let db = SqliteSnapshot::open(&path).unwrap();
        let mut sink = sink();
        read_state_db(&db, &mut sink).unwrap();
        let batch = sink.into_batch("x");
        assert_eq!(batch.windows.total.request_count, 2);
        assert_eq!(batch.windows.total.total_tokens, None);
        assert_eq!(batch.windows.today.request_count, 0);
    }

    #[test]
    fn test_unknown_schema_is_a_note() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.vscdb");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE other (x);")
            .unwrap();
        let db = SqliteSnapshot::open(&path).unwrap();
        let mut sink = sink();
        read_state_db(&db, &mut sink).unwrap();
        let batch = sink.into_batch("x");
        assert_eq!(batch.events, 0);
        assert!(batch.notes[0].contains("neither cursorDiskKV nor ItemTable"));
    }
}
