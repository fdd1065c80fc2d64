//! Line-delimited JSON reading.
//!
//! [`JsonLines`] yields one parsed record per line without loading the file
//! into memory. Malformed lines (bad JSON, invalid UTF-8) are counted and
//! skipped; blank lines are ignored. In mixed mode, lines that do not start
//! with `{` are plain log text and are ignored without being counted.
//!
//! An I/O error ends iteration; callers collect it with
//! [`JsonLines::take_error`].

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::FetchError;

// ============================================================================
// JSON Lines Iterator
// ============================================================================

/// Lazy iterator over the JSON records of a line-delimited file.
pub struct JsonLines<R> {
    reader: BufReader<R>,
    buf: Vec<u8>,
    line: u64,
    skipped: u64,
    error: Option<std::io::Error>,
    failed: bool,
    mixed: bool,
}

impl JsonLines<File> {
    /// Opens a file for line-by-line reading.
    pub fn open(path: &Path) -> Result<Self, FetchError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                FetchError::SourceNotFound(path.display().to_string())
            }
            _ => FetchError::Io(e),
        })?;
        Ok(Self::new(file))
    }
}

impl<R: Read> JsonLines<R> {
    /// Wraps any reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            buf: Vec::new(),
            line: 0,
            skipped: 0,
            error: None,
            failed: false,
            mixed: false,
        }
    }

    /// Ignores lines that are not JSON objects instead of counting them.
    #[must_use]
    pub fn mixed(mut self) -> Self {
        self.mixed = true;
        self
    }

    /// Number of malformed lines skipped so far.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Number of lines read so far.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Takes the read error that stopped iteration, if any.
    pub fn take_error(&mut self) -> Option<std::io::Error> {
        self.error.take()
    }
}

impl<R: Read> Iterator for JsonLines<R> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        if self.failed {
            return None;
        }

        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    warn!(line = self.line, error = %e, "Read failed, stopping");
                    self.error = Some(e);
                    self.failed = true;
                    return None;
                }
            }
            self.line += 1;

            let trimmed = self.buf.trim_ascii();
            if trimmed.is_empty() || (self.mixed && !trimmed.starts_with(b"{")) {
                continue;
            }

            match serde_json::from_slice::<Value>(trimmed) {
                Ok(value) => return Some(value),
                Err(e) => {
                    debug!(line = self.line, error = %e, "Skipping malformed line");
                    self.skipped += 1;
                }
            }
        }
    }
}

// ============================================================================
// Whole-file JSON
// ============================================================================

/// Reads a whole JSON document.
pub fn read_json(path: &Path) -> Result<Value, FetchError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => FetchError::SourceNotFound(path.display().to_string()),
        _ => FetchError::Io(e),
    })?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| FetchError::MalformedRecord(format!("{}: {e}", path.display())))
}

// ============================================================================
// Field Access
// ============================================================================

/// Reads a non-negative integer at a JSON pointer (`/a/b/c`).
///
/// Accepts integers, non-negative floats (truncated), and numeric strings.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn u64_at(value: &Value, pointer: &str) -> Option<u64> {
    match value.pointer(pointer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.is_finite()).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Returns the first pointer that yields a number.
pub fn first_u64(value: &Value, pointers: &[&str]) -> Option<u64> {
    pointers.iter().find_map(|p| u64_at(value, p))
}

/// Returns the first pointer that yields a value.
pub fn first_value<'a>(value: &'a Value, pointers: &[&str]) -> Option<&'a Value> {
    pointers
        .iter()
        .find_map(|p| value.pointer(p).filter(|v| !v.is_null()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_skips_malformed_and_blank() {
        let input = b"{\"a\":1}\n\nnot json\n{\"a\":2}\n\xff\xfe\n{\"a\":3}";
        let mut lines = JsonLines::new(&input[..]);
        let values: Vec<_> = lines.by_ref().collect();
        assert_eq!(values.len(), 3);
        assert_eq!(values[2]["a"], 3);
        assert_eq!(lines.skipped(), 2);
    }

    #[test]
    fn test_mixed_mode_ignores_text() {
        let input = b"2025-01-01 INFO started\n{\"a\":1}\n{broken\n";
        let mut lines = JsonLines::new(&input[..]).mixed();
        assert_eq!(lines.by_ref().count(), 1);
        assert_eq!(lines.skipped(), 1);
    }

    #[test]
    fn test_crlf_lines() {
        let input = b"{\"a\":1}\r\n{\"a\":2}\r\n";
        assert_eq!(JsonLines::new(&input[..]).count(), 2);
    }

    /// Yields one line, then fails.
    struct FailingReader {
        sent: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.sent {
                return Err(std::io::Error::other("disk gone"));
            }
            self.sent = true;
            let line = b"{\"a\":1}\n";
            buf[..line.len()].copy_from_slice(line);
            Ok(line.len())
        }
    }

    #[test]
    fn test_read_error_is_kept() {
        let mut lines = JsonLines::new(FailingReader { sent: false });
        assert_eq!(lines.by_ref().count(), 1);
        assert_eq!(lines.line(), 1);
        let err = lines.take_error().unwrap();
        assert_eq!(err.to_string(), "disk gone");
        assert!(lines.next().is_none());
        assert!(lines.take_error().is_none());
    }

    #[test]
    fn test_open_missing_is_not_found() {
        let err = JsonLines::open(Path::new("/no/such/file.jsonl")).err().unwrap();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_u64_at_shapes() {
        let v = json!({"u": {"i": 10, "f": 2.9, "s": "7", "neg": -1, "n": null}});
        assert_eq!(u64_at(&v, "/u/i"), Some(10));
        assert_eq!(u64_at(&v, "/u/f"), Some(2));
        assert_eq!(u64_at(&v, "/u/s"), Some(7));
        assert_eq!(u64_at(&v, "/u/neg"), None);
        assert_eq!(u64_at(&v, "/u/n"), None);
        assert_eq!(u64_at(&v, "/u/missing"), None);
    }

    #[test]
    fn test_first_u64() {
        let v = json!({"tokensIn": 5});
        assert_eq!(first_u64(&v, &["/inputTokens", "/tokensIn"]), Some(5));
    }
}
