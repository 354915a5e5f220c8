//! Integration tests for concurrent logging through one logger.

use std::sync::Arc;
use std::thread;

use taglog::{
    CollectingSink, Logger, LoggingConfig, MemoryLog, Severity, SharedBuffer, StreamSet,
};

const THREADS: usize = 8;
const RECORDS: usize = 250;

#[test]
fn records_from_many_threads_stay_contiguous() {
    let info = SharedBuffer::new();
    let error = SharedBuffer::new();
    let streams = StreamSet::new()
        .with_stream(Severity::Info, info.clone())
        .with_stream(Severity::Error, error.clone());
    let logger = Arc::new(Logger::new(streams));

    let handles: Vec<_> = (0..THREADS)
        .map(|id| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                let payload = format!("thread-{id}-").repeat(20);
                for n in 0..RECORDS {
                    if n % 2 == 0 {
                        logger.error_tag("worker", &[&payload, &n]);
                    } else {
                        logger.info_tagf("worker", format_args!("{payload} {n}"));
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker joins");
    }

    let info = info.contents_string();
    let error = error.contents_string();
    assert_eq!(info.lines().count(), THREADS * RECORDS);
    assert_eq!(error.lines().count(), THREADS * RECORDS / 2);

    for line in info.lines() {
        let (_, message) = line.split_once("] worker: ").expect("header then message");
        let id = message
            .strip_prefix("thread-")
            .and_then(|rest| rest.split('-').next())
            .expect("payload names its thread");
        let payload = format!("thread-{id}-").repeat(20);
        assert!(message.starts_with(&payload), "interleaved record: {line}");
    }
    assert!(error.lines().all(|line| line.contains(" [E] ")));
}

#[test]
fn config_swaps_during_logging_never_tear_records() {
    let log = Arc::new(MemoryLog::new());
    let logger = Arc::new(Logger::new(Arc::clone(&log)));

    let writer = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            for n in 0..500 {
                logger.info_tag("T", &[&"record", &n]);
            }
        })
    };
    for n in 0..100 {
        logger.update_config(|config| config.with_skip_headers(n % 2 == 0));
    }
    writer.join().expect("writer joins");

    let info = log.contents(Severity::Info);
    assert_eq!(info.lines().count(), 500);
    for line in info.lines() {
        assert!(
            line.starts_with("record ") || line.contains("] T: record "),
            "torn record: {line}"
        );
    }
}

#[test]
fn sink_sees_each_record_once_under_contention() {
    let sink = Arc::new(CollectingSink::new());
    let logger = Arc::new(
        Logger::new(MemoryLog::new()).with_config(LoggingConfig::new().with_sink(sink.clone())),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for _ in 0..RECORDS {
                    logger.warning_tag("T", &[&"m"]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker joins");
    }

    let records = sink.records();
    assert_eq!(records.len(), THREADS * RECORDS);
    assert!(records.iter().all(|record| record.message == "m"));
}
