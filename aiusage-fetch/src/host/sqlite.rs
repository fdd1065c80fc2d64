//! Read-only SQLite access.
//!
//! Editors keep their databases open and locked, so the database (and any
//! `-wal`/`-shm` sidecars) is copied into a temporary directory and the copy
//! is opened read-only. The copy is removed when the [`SqliteSnapshot`] is
//! dropped, on every exit path.

use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags, OptionalExtension};
use tempfile::TempDir;
use tracing::debug;

use crate::error::FetchError;

/// A read-only connection to a private copy of a database.
pub struct SqliteSnapshot {
    conn: Connection,
    source: PathBuf,
    // Dropped after `conn`, removing the copy.
    _dir: TempDir,
}

impl SqliteSnapshot {
    /// Copies `path` and opens the copy read-only.
    pub fn open(path: &Path) -> Result<Self, FetchError> {
        if !path.is_file() {
            return Err(FetchError::SourceNotFound(path.display().to_string()));
        }

        let dir = TempDir::new()?;
        let file_name = path
            .file_name()
            .map_or_else(|| "snapshot.db".into(), |n| n.to_os_string());
        let copy = dir.path().join(&file_name);
        fs::copy(path, &copy)?;

        for suffix in ["-wal", "-shm"] {
            let mut sidecar = path.as_os_str().to_os_string();
            sidecar.push(suffix);
            let sidecar = PathBuf::from(sidecar);
            if sidecar.is_file() {
                let mut target = copy.as_os_str().to_os_string();
                target.push(suffix);
                fs::copy(&sidecar, PathBuf::from(target))?;
            }
        }

        let conn = Connection::open_with_flags(
            &copy,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| FetchError::SourceUnreadable(format!("{}: {e}", path.display())))?;

        debug!(path = %path.display(), "Opened database snapshot");
        Ok(Self {
            conn,
            source: path.to_path_buf(),
            _dir: dir,
        })
    }

    /// The connection to the copy.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// The original database path.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Returns true if a table exists.
    pub fn table_exists(&self, table: &str) -> Result<bool, FetchError> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Returns the column names of a table (empty if the table is missing).
    pub fn columns(&self, table: &str) -> Result<Vec<String>, FetchError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1)")?;
        let names = stmt
            .query_map([table], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Returns true if a column exists on a table.
    pub fn column_exists(&self, table: &str, column: &str) -> Result<bool, FetchError> {
        Ok(self.columns(table)?.iter().any(|c| c.eq_ignore_ascii_case(column)))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(dir: &Path) -> PathBuf {
        let path = dir.join("state.vscdb");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE ItemTable (key TEXT PRIMARY KEY, value TEXT);
             INSERT INTO ItemTable VALUES ('a', '1');",
        )
        .unwrap();
        path
    }

    #[test]
    fn test_missing_database_is_not_found() {
        let err = SqliteSnapshot::open(Path::new("/no/such/state.vscdb")).err().unwrap();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("/no/such/state.vscdb"));
    }

    #[test]
    fn test_schema_introspection() {
        let dir = TempDir::new().unwrap();
        let snap = SqliteSnapshot::open(&fixture(dir.path())).unwrap();
        assert!(snap.table_exists("ItemTable").unwrap());
        assert!(!snap.table_exists("cursorDiskKV").unwrap());
        assert!(snap.column_exists("ItemTable", "value").unwrap());
        assert!(!snap.column_exists("ItemTable", "createdAt").unwrap());
        assert!(snap.columns("nope").unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_is_read_only() {
        let dir = TempDir::new().unwrap();
        let snap = SqliteSnapshot::open(&fixture(dir.path())).unwrap();
        assert!(snap.conn().execute("DELETE FROM ItemTable", []).is_err());
    }

    #[test]
    fn test_garbage_file_is_unreadable_or_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("warp.sqlite");
        fs::write(&path, b"this is not a database").unwrap();
        // SQLite opens lazily; the first query reports the damage.
        match SqliteSnapshot::open(&path) {
            Ok(snap) => assert!(snap.table_exists("x").is_err()),
            Err(e) => assert!(!e.is_not_found()),
        }
    }
}
