//! Embedded-database parser family.
//!
//! Editors keep usage in SQLite files they hold open. Each database is read
//! through a [`SqliteSnapshot`] copy and handed to a provider-specific reader
//! that pushes events into an [`EventSink`].

use std::path::PathBuf;

use aiusage_fetch::{
    FetchContext, FetchError, PathRoots, SourceBatch, SourceKind, SourceLocator, SqliteSnapshot,
    UsageSource, run_blocking,
};
use async_trait::async_trait;
use rusqlite::Row;
use rusqlite::types::ValueRef;
use tracing::{debug, instrument, warn};

use super::logs::EventSink;

/// Reads one database snapshot.
pub type DbReader = fn(&SqliteSnapshot, &mut EventSink) -> Result<(), FetchError>;

// ============================================================================
// Database Source
// ============================================================================

/// A source backed by one primary database and optional secondary ones.
pub struct DatabaseSource {
    id: &'static str,
    path: fn(&PathRoots) -> PathBuf,
    extra: Option<fn(&PathRoots) -> Vec<PathBuf>>,
    reader: DbReader,
}

impl DatabaseSource {
    /// Creates a source for a single database.
    pub fn new(id: &'static str, path: fn(&PathRoots) -> PathBuf, reader: DbReader) -> Self {
        Self {
            id,
            path,
            extra: None,
            reader,
        }
    }

    /// Also reads secondary databases (per-workspace state and similar).
    ///
    /// Secondary databases that fail to open are skipped with a note.
    #[must_use]
    pub fn with_extra(mut self, extra: fn(&PathRoots) -> Vec<PathBuf>) -> Self {
        self.extra = Some(extra);
        self
    }
}

#[async_trait]
impl UsageSource for DatabaseSource {
    fn id(&self) -> &str {
        self.id
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Database
    }

    fn locate(&self, ctx: &FetchContext) -> SourceLocator {
        SourceLocator::Database((self.path)(&ctx.roots))
    }

    #[instrument(skip(self, ctx), fields(source = self.id))]
    async fn read(&self, ctx: &FetchContext) -> Result<SourceBatch, FetchError> {
        let primary = (self.path)(&ctx.roots);
        let extra = self.extra.map(|f| f(&ctx.roots)).unwrap_or_default();
        let reader = self.reader;
        let bounds = ctx.bounds;

        run_blocking(move || {
            let mut sink = EventSink::new(bounds);
            let db = SqliteSnapshot::open(&primary)?;
            if let Err(e) = reader(&db, &mut sink) {
                if !e.is_schema_gap() {
                    return Err(e);
                }
                warn!(db = %primary.display(), error = %e, "Schema gap, continuing");
                sink.note(format!("{}: {e}", primary.display()));
            }

            let mut failed = 0;
            for path in extra.iter().filter(|p| **p != primary) {
                let result = SqliteSnapshot::open(path).and_then(|db| reader(&db, &mut sink));
                match result {
                    Ok(()) => {}
                    Err(e) if e.is_schema_gap() => {
                        debug!(path = %path.display(), error = %e, "Schema gap in secondary database");
                    }
                    Err(e) => {
                        debug!(path = %path.display(), error = %e, "Skipping secondary database");
                        failed += 1;
                    }
                }
            }
            if failed > 0 {
                sink.note(format!("{failed} secondary database(s) could not be read"));
            }

            Ok(sink.into_batch(primary.display().to_string()))
        })
        .await
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Reads a TEXT or BLOB column as a string.
pub fn column_text(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
        ValueRef::Integer(n) => Some(n.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Null => None,
    })
}

/// Returns `column` if the table has it, otherwise the literal `NULL`.
///
/// Lets a query keep running across schema versions: a renamed or dropped
/// column reads as null and the gap is noted on the sink.
pub fn column_or_null(
    db: &SqliteSnapshot,
    table: &str,
    column: &'static str,
    sink: &mut EventSink,
) -> Result<&'static str, FetchError> {
    if db.column_exists(table, column)? {
        return Ok(column);
    }
    warn!(db = %db.source().display(), table, column, "Expected column missing");
    sink.note(format!("column {table}.{column} missing in {}", db.source().display()));
    Ok("NULL")
}

/// Reads every JSON value of a key/value table whose key matches `pattern`.
///
/// Rows whose value is not JSON are counted as skipped.
pub fn json_values(
    db: &SqliteSnapshot,
    table: &str,
    pattern: &str,
    sink: &mut EventSink,
) -> Result<Vec<serde_json::Value>, FetchError> {
    let sql = format!("SELECT value FROM {table} WHERE key LIKE ?1");
    let mut stmt = db.conn().prepare(&sql)?;
    let texts = stmt
        .query_map([pattern], |row| column_text(row, 0))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut values = Vec::with_capacity(texts.len());
    for text in texts.into_iter().flatten() {
        match serde_json::from_str(&text) {
            Ok(value) => values.push(value),
            Err(_) => sink.skip(),
        }
    }
    Ok(values)
}

// ============================================================================
// Tests
// ============================================================================
