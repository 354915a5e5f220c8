//! Integration tests for the fixed text header layout.
//!
//! Headers are rendered with a frozen clock and pid so the expected bytes can
//! be spelled out in full.

use std::sync::Arc;

use taglog::{FixedClock, Logger, LoggingConfig, MemoryLog, Severity, SystemClock};
use time::macros::{datetime, offset};

fn frozen(log: &Arc<MemoryLog>) -> Logger {
    Logger::new(Arc::clone(log))
        .with_clock(FixedClock(datetime!(2025-11-30 21:05:00.250 UTC)))
        .with_pid(77)
}

fn header_text(logger: &Logger, tag: &str, severity: Severity, file: &str, line: i64) -> String {
    let buffer = logger.format_header_tag(tag, severity, file, line);
    let text = String::from_utf8(buffer.as_bytes().to_vec()).expect("ascii header");
    logger.release_buffer(buffer);
    text
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn header_fields_in_fixed_order() {
    let log = Arc::new(MemoryLog::new());
    let logger = frozen(&log);

    assert_eq!(
        header_text(&logger, "TestTAG", Severity::Warning, "conn.rs", 128),
        "2025-11-30 21:05:00.250 UTC      77 [W] conn.rs:128] TestTAG: "
    );
}

#[test]
fn frozen_clock_headers_are_byte_identical() {
    let log = Arc::new(MemoryLog::new());
    let logger = frozen(&log);

    let first = header_text(&logger, "T", Severity::Error, "a.rs", 9);
    let second = header_text(&logger, "T", Severity::Error, "a.rs", 9);
    assert_eq!(first, second);
}

#[test]
fn pid_field_is_seven_columns_wide() {
    let log = Arc::new(MemoryLog::new());
    for (pid, field) in [(1, "      1"), (1_234_567, "1234567"), (98_765_432, "8765432")] {
        let logger = frozen(&log).with_pid(pid);
        let header = header_text(&logger, "T", Severity::Info, "a.rs", 1);
        assert_eq!(&header[28..35], field, "{header}");
        assert_eq!(&header[35..40], " [I] ", "{header}");
    }
}

#[test]
fn negative_line_numbers_render_as_zero() {
    let log = Arc::new(MemoryLog::new());
    let logger = frozen(&log);

    let header = header_text(&logger, "T", Severity::Fatal, "a.rs", -40);
    assert!(header.ends_with("[F] a.rs:0] T: "), "{header}");
}

#[test]
fn non_utc_offsets_render_numerically() {
    let log = Arc::new(MemoryLog::new());
    let logger = Logger::new(Arc::clone(&log))
        .with_clock(FixedClock(datetime!(2025-11-30 21:05:00 -03:30)))
        .with_pid(77);

    let header = header_text(&logger, "T", Severity::Info, "a.rs", 1);
    assert!(header.starts_with("2025-11-30 21:05:00.000 -0330      77 "), "{header}");
}

#[test]
fn system_clock_headers_keep_layout() {
    let log = Arc::new(MemoryLog::new());
    let logger = Logger::new(Arc::clone(&log))
        .with_clock(SystemClock::with_offset(offset!(UTC)))
        .with_pid(77);

    let header = header_text(&logger, "T", Severity::Info, "a.rs", 1);
    assert_eq!(header.len(), "2025-11-30 21:05:00.250 UTC      77 [I] a.rs:1] T: ".len());
    assert_eq!(&header[23..28], " UTC ");
}

// ============================================================================
// Header Options
// ============================================================================

#[test]
fn skip_headers_returns_empty_buffer() {
    let log = Arc::new(MemoryLog::new());
    let logger = frozen(&log).with_config(LoggingConfig::new().with_skip_headers(true));

    assert_eq!(header_text(&logger, "T", Severity::Error, "a.rs", 3), "");

    logger.error_tag("T", &[&"message only"]);
    assert_eq!(log.contents(Severity::Error), "message only\n");
}

#[test]
fn resolved_file_is_trimmed_to_basename() {
    let log = Arc::new(MemoryLog::new());
    let logger = frozen(&log);

    let line = line!() + 1;
    logger.info_tag("T", &[&"m"]);

    let expected = format!(
        "2025-11-30 21:05:00.250 UTC      77 [I] header_layout.rs:{line}] T: m\n"
    );
    assert_eq!(log.contents(Severity::Info), expected);
}

#[test]
fn add_dir_header_keeps_test_directory() {
    let log = Arc::new(MemoryLog::new());
    let logger = frozen(&log).with_config(LoggingConfig::new().with_add_dir_header(true));

    logger.info_tag("T", &[&"m"]);

    assert!(
        log.contents(Severity::Info).contains(" [I] tests/header_layout.rs:"),
        "{}",
        log.contents(Severity::Info)
    );
}

#[test]
fn tags_are_written_verbatim() {
    let log = Arc::new(MemoryLog::new());
    let logger = frozen(&log);

    let owned = String::from("net::http/2");
    logger.info_tag(&owned, &[&"m"]);
    logger.info_tag("", &[&"untagged"]);

    let info = log.contents(Severity::Info);
    assert!(info.contains("] net::http/2: m\n"), "{info}");
    assert!(info.contains("] : untagged\n"), "{info}");
}
