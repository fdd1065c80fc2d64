//! Warp database reader.

use aiusage_core::{UsageEvent, time};
use aiusage_fetch::{FetchError, SqliteSnapshot};
use serde::Deserialize;
use tracing::debug;

use crate::formats::database::{column_or_null, column_text};
use crate::formats::{EventSink, Record};

const CONVERSATIONS: &str = "agent_conversations";
const QUERIES: &str = "ai_queries";

#[derive(Debug, Deserialize)]
struct ConversationData {
    conversation_usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(default)]
    token_usage: Vec<TokenUsage>,
}

/// One per-model entry of `token_usage`.
///
/// Older builds report `total_tokens`; current ones split Warp-billed and
/// bring-your-own-key tokens.
#[derive(Debug, Deserialize)]
struct TokenUsage {
    total_tokens: Option<u64>,
    warp_tokens: Option<u64>,
    byok_tokens: Option<u64>,
}

impl TokenUsage {
    fn tokens(&self) -> Option<u64> {
        self.total_tokens.or(match (self.warp_tokens, self.byok_tokens) {
            (None, None) => None,
            (warp, byok) => Some(warp.unwrap_or(0).saturating_add(byok.unwrap_or(0))),
        })
    }
}

/// Reads one `warp.sqlite` snapshot.
///
/// Missing tables and columns are noted and read as absent; they never
/// fail the read.
pub fn read_warp_db(db: &SqliteSnapshot, sink: &mut EventSink) -> Result<(), FetchError> {
    let has_conversations = db.table_exists(CONVERSATIONS)?;
    let has_queries = db.table_exists(QUERIES)?;
    if !has_conversations && !has_queries {
        sink.note(format!(
            "neither {CONVERSATIONS} nor {QUERIES} in {}",
            db.source().display()
        ));
        return Ok(());
    }

    let before = sink.event_count();
    if has_conversations {
        read_conversations(db, sink)?;
    }

    if has_queries && sink.event_count() == before {
        let start = column_or_null(db, QUERIES, "start_ts", sink)?;
        let mut stmt = db.conn().prepare(&format!("SELECT {start} FROM {QUERIES}"))?;
        let starts = stmt
            .query_map([], |row| column_text(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;
        debug!(db = %db.source().display(), queries = starts.len(), "Using ai_queries request counts");
        for start in starts {
            sink.push(UsageEvent::new(start.as_deref().and_then(time::from_str)));
        }
    }
    Ok(())
}

fn read_conversations(db: &SqliteSnapshot, sink: &mut EventSink) -> Result<(), FetchError> {
    if !db.column_exists(CONVERSATIONS, "conversation_data")? {
        sink.note(format!(
            "column {CONVERSATIONS}.conversation_data missing in {}",
            db.source().display()
        ));
        return Ok(());
    }

    let modified = column_or_null(db, CONVERSATIONS, "last_modified_at", sink)?;
    let mut stmt = db.conn().prepare(&format!(
        "SELECT conversation_data, {modified} FROM {CONVERSATIONS}"
    ))?;
    let rows = stmt
        .query_map([], |row| Ok((column_text(row, 0)?, column_text(row, 1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    for (data, modified) in rows {
        let Some(data) = data else {
            sink.skip();
            continue;
        };
        sink.apply(conversation_event(&data, modified.as_deref()));
    }
    Ok(())
}

/// Turns one conversation row into a total-only event.
///
/// Conversations without usage metadata, or whose counters are all zero,
/// carry no usage.
pub fn conversation_event(data: &str, modified: Option<&str>) -> Record {
    let Ok(data) = serde_json::from_str::<ConversationData>(data) else {
        return Record::Malformed;
    };
    let Some(metadata) = data.conversation_usage_metadata else {
        return Record::Ignored;
    };

    let total = metadata
        .token_usage
        .iter()
        .filter_map(TokenUsage::tokens)
        .fold(0u64, u64::saturating_add);
    if total == 0 {
        return Record::Ignored;
    }

    Record::Event(UsageEvent::new(modified.and_then(time::from_str)).with_total(Some(total)))
}
