//! Keyword scanning over log files and readers.

use std::io::{Cursor, Read};
use std::path::Path;

use coroner::scanner::{
    scan, scan_context, scan_reader, LogContext, LogScanResult, ScanError, ScanOptions,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_log(dir: &tempfile::TempDir, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join("app.log");
    std::fs::write(&path, contents).expect("write log");
    path
}

fn scan_text(text: &str) -> LogScanResult {
    scan_reader(Cursor::new(text.as_bytes()), &ScanOptions::default()).expect("in-memory scan")
}

// ---------------------------------------------------------------------------
// Absent and unreadable logs
// ---------------------------------------------------------------------------

#[test]
fn absent_log_is_all_false() {
    let result = scan(None, &ScanOptions::default()).expect("absent log is not an error");
    assert_eq!(result, LogScanResult::default());
    assert!(!result.any());
}

#[test]
fn empty_log_is_all_false() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_log(&dir, b"");
    let result = scan(Some(&path), &ScanOptions::default()).expect("empty log scans");
    assert!(!result.any());
}

#[test]
fn missing_log_is_an_open_error() {
    let err = scan(
        Some(Path::new("/nonexistent/coroner/app.log")),
        &ScanOptions::default(),
    )
    .expect_err("missing file must fail");
    assert!(matches!(err, ScanError::Open { .. }));
    assert!(err.to_string().contains("/nonexistent/coroner/app.log"));
}

#[test]
fn scan_context_absorbs_read_failures() {
    let context = scan_context(
        Some(Path::new("/nonexistent/coroner/app.log")),
        &ScanOptions::default(),
    );
    assert!(matches!(context, LogContext::Unreadable { .. }));
    assert_eq!(context.flags(), LogScanResult::default());
}

#[test]
fn scan_context_without_path_is_not_provided() {
    let context = scan_context(None, &ScanOptions::default());
    assert_eq!(context, LogContext::NotProvided);
}

// ---------------------------------------------------------------------------
// Keyword groups
// ---------------------------------------------------------------------------

#[test]
fn sigsegv_sets_only_segfault_flag() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_log(&dir, b"worker 3 received SIGSEGV at 0x0\n");
    let result = scan(Some(&path), &ScanOptions::default()).expect("scan");
    assert_eq!(
        result,
        LogScanResult {
            segfault: true,
            memory: false,
            timeout: false,
            resource: false,
        }
    );
}

#[test]
fn matching_is_case_insensitive() {
    let result = scan_text("DEADLOCK detected between writer and flusher\n");
    assert!(result.timeout);

    let result = scan_text("Segmentation Fault in module loader\n");
    assert!(result.segfault);
}

#[test]
fn substring_matches_without_word_boundaries() {
    // "freed" contains "free"; "stuckness" contains "stuck".
    let result = scan_text("buffer freed twice\nqueue stuckness observed\n");
    assert!(result.memory);
    assert!(result.timeout);
}

#[test]
fn out_of_memory_raises_memory_and_resource() {
    let result = scan_text("fatal: Out of memory while growing arena\n");
    assert!(result.resource);
    assert!(result.memory);
    assert!(!result.timeout);
}

#[test]
fn flags_accumulate_across_lines() {
    let result = scan_text(
        "start\n\
         request timeout after 30s\n\
         nothing here\n\
         pool exhausted\n\
         malloc returned null\n\
         segfault in handler\n",
    );
    assert!(result.timeout);
    assert!(result.resource);
    assert!(result.memory);
    assert!(result.segfault);
}

#[test]
fn flags_are_not_reset_by_later_lines() {
    let result = scan_text("thread hung\nall good now\nok\n");
    assert!(result.timeout);
}

#[test]
fn last_line_without_newline_is_scanned() {
    let result = scan_text("first line\nENOMEM returned by mmap");
    assert!(result.resource);
}

// ---------------------------------------------------------------------------
// Line bound and encoding
// ---------------------------------------------------------------------------

#[test]
fn keywords_past_the_line_bound_are_lost() {
    let mut line = "x".repeat(2000);
    line.push_str(" timeout\n");

    let result = scan_text(&line);
    assert!(!result.timeout, "keyword beyond 1024 bytes is truncated away");

    let wide = ScanOptions {
        max_line_bytes: 4096,
    };
    let result = scan_reader(Cursor::new(line.as_bytes()), &wide).expect("scan");
    assert!(result.timeout);
}

#[test]
fn lines_after_a_long_line_are_still_scanned() {
    let mut text = "y".repeat(5000);
    text.push_str("\nmemory leak suspected\n");
    let result = scan_text(&text);
    assert!(result.memory);
}

#[test]
fn invalid_utf8_does_not_stop_the_scan() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_log(&dir, b"\xff\xfe garbage \xc3\n heap corruption detected\n");
    let result = scan(Some(&path), &ScanOptions::default()).expect("scan");
    assert!(result.memory);
}

#[test]
fn unterminated_huge_line_is_skipped_not_buffered() {
    let huge = std::io::repeat(b'x').take(32 * 1024 * 1024);
    let tail = Cursor::new(&b" deadlock\nheap corruption\n"[..]);
    let reader = std::io::BufReader::new(huge.chain(tail));

    let result = scan_reader(reader, &ScanOptions::default()).expect("scan");
    assert!(!result.timeout, "keyword at the end of the long line is dropped");
    assert!(result.memory, "the following line is scanned");
}

#[test]
fn line_filling_the_bound_exactly_keeps_next_line() {
    let mut text = "z".repeat(1024);
    text.push_str("\nthread stuck\n");
    let result = scan_text(&text);
    assert!(result.timeout);
}
