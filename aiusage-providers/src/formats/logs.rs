//! Line-log and JSON-file parser family.
//!
//! Most tools append usage to line-delimited JSON logs or keep one JSON
//! document per session. A [`LogSource`] scans a file or directory and hands
//! every record to a provider-specific function that turns it into at most
//! one canonical event.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use aiusage_core::{Aggregator, PeriodBounds, UsageEvent};
use aiusage_fetch::host::{files, jsonl};
use aiusage_fetch::{
    FetchContext, FetchError, JsonLines, PathRoots, SourceBatch, SourceKind, SourceLocator,
    UsageSource, run_blocking,
};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument, warn};

// ============================================================================
// Records and Sink
// ============================================================================

/// The file a record came from.
///
/// File modification times are never used as event timestamps; an undated
/// record counts toward `total` only.
#[derive(Debug, Clone)]
pub struct FileMeta {
    /// File path.
    pub path: PathBuf,
}

impl FileMeta {
    /// Describes a file.
    pub fn of(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

/// What a record parser made of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// A usage event.
    Event(UsageEvent),
    /// A well-formed record that carries no usage (user turns, metadata).
    Ignored,
    /// A record missing fields it must have.
    Malformed,
}

/// Collects the events of one source read.
#[derive(Debug)]
pub struct EventSink {
    aggregator: Aggregator,
    skipped: u64,
    notes: Vec<String>,
}

impl EventSink {
    /// Creates an empty sink.
    pub fn new(bounds: PeriodBounds) -> Self {
        Self {
            aggregator: Aggregator::new(bounds),
            skipped: 0,
            notes: Vec::new(),
        }
    }

    /// Adds an event.
    pub fn push(&mut self, event: UsageEvent) {
        self.aggregator.add(&event);
    }

    /// Counts one skipped record.
    pub fn skip(&mut self) {
        self.skipped += 1;
    }

    /// Counts several skipped records.
    pub fn skip_many(&mut self, count: u64) {
        self.skipped += count;
    }

    /// Applies a parser verdict.
    pub fn apply(&mut self, record: Record) {
        match record {
            Record::Event(event) => self.push(event),
            Record::Ignored => {}
            Record::Malformed => self.skip(),
        }
    }

    /// Records a note about degraded reading.
    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Number of events pushed so far.
    pub fn event_count(&self) -> u64 {
        self.aggregator.event_count()
    }

    /// Number of records skipped so far.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Finishes into a batch.
    pub fn into_batch(self, location: impl Into<String>) -> SourceBatch {
        let mut batch = SourceBatch::from_aggregator(location, self.aggregator).with_skipped(self.skipped);
        batch.notes = self.notes;
        batch
    }
}

// ============================================================================
// Formats and Targets
// ============================================================================

/// Parses one JSON line.
pub type LineParser = fn(&Value, &FileMeta) -> Record;

/// Parses one plain-text line.
pub type TextParser = fn(&str, &FileMeta) -> Record;

/// Parses a whole JSON document, which may hold any number of events.
pub type DocumentParser = fn(&Value, &FileMeta, &mut EventSink);

/// How files are laid out.
#[derive(Clone, Copy)]
pub enum LogFormat {
    /// One JSON object per line; anything else is malformed.
    Lines(LineParser),
    /// Plain log text with JSON lines mixed in; only the JSON is parsed.
    MixedLines(LineParser),
    /// Plain text lines handed to the parser as-is.
    Text(TextParser),
    /// One JSON document per file.
    Documents(DocumentParser),
}

/// Where the files are.
#[derive(Clone, Copy)]
pub enum LogTarget {
    /// A single file.
    File(fn(&PathRoots) -> PathBuf),
    /// Files under a directory.
    Dir {
        /// The directory.
        root: fn(&PathRoots) -> PathBuf,
        /// Maximum recursion depth (1 = direct children).
        depth: usize,
        /// Which files to read.
        filter: fn(&Path) -> bool,
    },
}

impl LogTarget {
    fn locator(&self, roots: &PathRoots) -> SourceLocator {
        match self {
            Self::File(path) => SourceLocator::File(path(roots)),
            Self::Dir { root, .. } => SourceLocator::Directory(root(roots)),
        }
    }
}

// ============================================================================
// Log Source
// ============================================================================

/// A source backed by log files.
pub struct LogSource {
    id: &'static str,
    target: LogTarget,
    format: LogFormat,
    require_files: bool,
}

impl LogSource {
    /// Creates a log source.
    pub fn new(id: &'static str, target: LogTarget, format: LogFormat) -> Self {
        Self {
            id,
            target,
            format,
            require_files: false,
        }
    }

    /// Treats an existing directory without matching files as not found.
    ///
    /// Used when another source of the same provider covers that case.
    #[must_use]
    pub fn require_files(mut self) -> Self {
        self.require_files = true;
        self
    }
}

#[async_trait]
impl UsageSource for LogSource {
    fn id(&self) -> &str {
        self.id
    }

    fn kind(&self) -> SourceKind {
        SourceKind::LogFiles
    }

    fn locate(&self, ctx: &FetchContext) -> SourceLocator {
        self.target.locator(&ctx.roots)
    }

    #[instrument(skip(self, ctx), fields(source = self.id))]
    async fn read(&self, ctx: &FetchContext) -> Result<SourceBatch, FetchError> {
        let target = self.target;
        let format = self.format;
        let roots = ctx.roots.clone();
        let bounds = ctx.bounds;
        let require_files = self.require_files;
        run_blocking(move || scan(target, format, &roots, bounds, require_files)).await
    }
}

/// Directory filter for `.jsonl` files.
pub fn is_jsonl(path: &Path) -> bool {
    files::has_extension(path, &["jsonl"])
}

/// Directory filter for `.json` files.
pub fn is_json(path: &Path) -> bool {
    files::has_extension(path, &["json"])
}

fn scan(
    target: LogTarget,
    format: LogFormat,
    roots: &PathRoots,
    bounds: PeriodBounds,
    require_files: bool,
) -> Result<SourceBatch, FetchError> {
    let (location, paths) = match target {
        LogTarget::File(path) => {
            let path = path(roots);
            if !path.is_file() {
                return Err(FetchError::SourceNotFound(path.display().to_string()));
            }
            (path.clone(), vec![path])
        }
        LogTarget::Dir {
            root,
            depth,
            filter,
        } => {
            let root = root(roots);
            if !root.is_dir() {
                return Err(FetchError::SourceNotFound(root.display().to_string()));
            }
            let paths = files::find_files(&root, depth, filter);
            if paths.is_empty() && require_files {
                return Err(FetchError::SourceNotFound(format!(
                    "{} (no usage logs)",
                    root.display()
                )));
            }
            (root, paths)
        }
    };

    debug!(location = %location.display(), files = paths.len(), "Scanning logs");

    let mut sink = EventSink::new(bounds);
    read_files(&paths, &mut sink, |path, sink| read_file(path, format, sink))?;
    Ok(sink.into_batch(location.display().to_string()))
}

/// Reads every file into the sink.
///
/// When every file fails, the first error is returned as is. Otherwise the
/// failures become a note.
fn read_files<F>(paths: &[PathBuf], sink: &mut EventSink, mut read: F) -> Result<(), FetchError>
where
    F: FnMut(&Path, &mut EventSink) -> Result<(), FetchError>,
{
    let mut failed = Vec::new();
    for path in paths {
        if let Err(e) = read(path, sink) {
            warn!(path = %path.display(), error = %e, "Failed to read log file");
            failed.push(e);
        }
    }

    if !paths.is_empty() && failed.len() == paths.len() {
        return Err(failed.swap_remove(0));
    }
    if !failed.is_empty() {
        sink.note(format!("{} file(s) could not be read", failed.len()));
    }
    Ok(())
}

/// Attaches the path to an I/O error.
fn io_at(path: &Path, e: std::io::Error) -> FetchError {
    FetchError::Io(std::io::Error::new(e.kind(), format!("{}: {e}", path.display())))
}

fn read_file(path: &Path, format: LogFormat, sink: &mut EventSink) -> Result<(), FetchError> {
    let meta = FileMeta::of(path);
    match format {
        LogFormat::Lines(parse) | LogFormat::MixedLines(parse) => {
            let mut lines = JsonLines::open(path)?;
            if matches!(format, LogFormat::MixedLines(_)) {
                lines = lines.mixed();
            }
            read_lines(lines, parse, &meta, sink)?;
        }
        LogFormat::Text(parse) => {
            let mut reader = BufReader::new(File::open(path).map_err(|e| io_at(path, e))?);
            let mut buf = Vec::new();
            let mut line_no = 0u64;
            loop {
                buf.clear();
                match reader.read_until(b'\n', &mut buf) {
                    Ok(0) => break,
                    Ok(_) => line_no += 1,
                    Err(e) => {
                        truncated(path, line_no, e, sink)?;
                        break;
                    }
                }
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim();
                if !line.is_empty() {
                    sink.apply(parse(line, &meta));
                }
            }
        }
        LogFormat::Documents(parse) => match jsonl::read_json(path) {
            Ok(value) => parse(&value, &meta, sink),
            Err(FetchError::MalformedRecord(reason)) => {
                debug!(%reason, "Skipping malformed document");
                sink.skip();
            }
            Err(FetchError::Io(e)) => return Err(io_at(path, e)),
            Err(e) => return Err(e),
        },
    }
    Ok(())
}

fn read_lines<R: Read>(
    mut lines: JsonLines<R>,
    parse: LineParser,
    meta: &FileMeta,
    sink: &mut EventSink,
) -> Result<(), FetchError> {
    for value in lines.by_ref() {
        sink.apply(parse(&value, meta));
    }
    sink.skip_many(lines.skipped());
    match lines.take_error() {
        Some(e) => truncated(&meta.path, lines.line(), e, sink),
        None => Ok(()),
    }
}

/// Handles a read error partway through a file.
///
/// A file that failed before its first line is a failed file. Later
/// failures keep the events read so far and add a note.
fn truncated(
    path: &Path,
    line: u64,
    e: std::io::Error,
    sink: &mut EventSink,
) -> Result<(), FetchError> {
    if line == 0 {
        return Err(io_at(path, e));
    }
    warn!(path = %path.display(), line, error = %e, "Log file truncated by read error");
    sink.note(format!("{} truncated after line {line}: {e}", path.display()));
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
