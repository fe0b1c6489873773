//! Line-oriented keyword scan of a log artifact.
//!
//! Each keyword group raises one independent flag. Matching is plain
//! case-insensitive substring containment with no word boundaries.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

/// Default per-line bound in bytes. Longer lines are truncated.
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024;

const SEGFAULT_KEYWORDS: &[&str] = &["segfault", "segmentation", "sigsegv"];
const MEMORY_KEYWORDS: &[&str] = &["memory", "malloc", "free", "leak", "corruption"];
const TIMEOUT_KEYWORDS: &[&str] = &["timeout", "deadlock", "hung", "stuck"];
const RESOURCE_KEYWORDS: &[&str] = &["out of memory", "enomem", "resource", "exhausted"];

/// Tuning for a scan pass.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Lines are cut to this many bytes before matching.
    pub max_line_bytes: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }
}

/// Keyword flags gathered from one log artifact.
///
/// Flags only ever go from `false` to `true` during a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LogScanResult {
    /// Segmentation-fault wording was seen.
    pub segfault: bool,
    /// Allocation or memory wording was seen.
    pub memory: bool,
    /// Timeout, deadlock or hang wording was seen.
    pub timeout: bool,
    /// Resource exhaustion wording was seen.
    pub resource: bool,
}

impl LogScanResult {
    /// Whether any flag is set.
    pub fn any(&self) -> bool {
        self.segfault || self.memory || self.timeout || self.resource
    }

    /// Fold one already-lowercased line into the flags.
    fn observe(&mut self, line: &str) {
        let hit = |group: &[&str]| group.iter().any(|kw| line.contains(kw));
        self.segfault |= hit(SEGFAULT_KEYWORDS);
        self.memory |= hit(MEMORY_KEYWORDS);
        self.timeout |= hit(TIMEOUT_KEYWORDS);
        self.resource |= hit(RESOURCE_KEYWORDS);
    }
}

/// Log artifact could not be read.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The file could not be opened.
    #[error("failed to open log file {}: {source}", path.display())]
    Open {
        /// Requested path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Reading failed part-way through.
    #[error("failed to read log file {}: {source}", path.display())]
    Read {
        /// Requested path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Scan an optional log file.
///
/// No path means no log context: the result is all-false and no error.
///
/// # Errors
///
/// Returns [`ScanError`] when the path is present but cannot be opened or read.
pub fn scan(log_path: Option<&Path>, opts: &ScanOptions) -> Result<LogScanResult, ScanError> {
    let Some(path) = log_path else {
        return Ok(LogScanResult::default());
    };

    let file = File::open(path).map_err(|source| ScanError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    scan_reader(BufReader::new(file), opts).map_err(|source| ScanError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// What log context a classification ended up with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LogContext {
    /// No log path was supplied.
    NotProvided,
    /// The log was scanned to completion.
    Scanned {
        /// Flags raised by the scan.
        flags: LogScanResult,
    },
    /// The log could not be read; classification proceeds without it.
    Unreadable {
        /// Rendered [`ScanError`].
        error: String,
    },
}

impl LogContext {
    /// Flags to classify with. All-false unless the scan succeeded.
    pub fn flags(&self) -> LogScanResult {
        match self {
            Self::Scanned { flags } => *flags,
            Self::NotProvided | Self::Unreadable { .. } => LogScanResult::default(),
        }
    }
}

/// Scan an optional log file, absorbing read failures.
///
/// An unreadable log is logged and reported as [`LogContext::Unreadable`].
pub fn scan_context(log_path: Option<&Path>, opts: &ScanOptions) -> LogContext {
    if log_path.is_none() {
        return LogContext::NotProvided;
    }

    match scan(log_path, opts) {
        Ok(flags) => LogContext::Scanned { flags },
        Err(e) => {
            warn!(error = %e, "log unavailable, continuing without log context");
            LogContext::Unreadable {
                error: e.to_string(),
            }
        }
    }
}

/// Scan any buffered reader line by line.
///
/// At most `max_line_bytes` of each line are buffered; the rest of an
/// over-long line is skipped without being stored. Input need not be UTF-8;
/// invalid sequences are replaced before matching.
///
/// # Errors
///
/// Propagates I/O errors from the reader.
pub fn scan_reader<R: BufRead>(mut reader: R, opts: &ScanOptions) -> std::io::Result<LogScanResult> {
    let mut result = LogScanResult::default();
    let limit = opts.max_line_bytes.max(1);
    let take_limit = u64::try_from(limit).unwrap_or(u64::MAX);
    let mut buf = Vec::with_capacity(limit);
    let mut lines: u64 = 0;
    let mut truncated: u64 = 0;

    loop {
        buf.clear();
        let read = (&mut reader).take(take_limit).read_until(b'\n', &mut buf)?;
        if read == 0 {
            break;
        }
        if read == limit && buf.last() != Some(&b'\n') {
            skip_line(&mut reader)?;
            truncated = truncated.saturating_add(1);
        }

        let line = String::from_utf8_lossy(&buf).to_lowercase();
        result.observe(&line);
        lines = lines.saturating_add(1);
    }

    debug!(lines, truncated, ?result, "log scan complete");
    Ok(result)
}

/// Discard input up to and including the next newline, or to EOF.
fn skip_line<R: BufRead>(reader: &mut R) -> std::io::Result<()> {
    loop {
        let available = match reader.fill_buf() {
            Ok(available) => available,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(end) => {
                reader.consume(end.saturating_add(1));
                return Ok(());
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}
