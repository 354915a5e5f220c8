//! crates/logging-sink/src/tracing_sink.rs
//! Structured sink that re-emits records as `tracing` events.
//!
//! Every record becomes one event on the `taglog` target. The tag, source
//! file, source line and call depth are attached as event fields so any
//! `tracing-subscriber` layer can render or filter them.
//!
//! | severity | tracing level |
//! |----------|---------------|
//! | INFO     | `INFO`        |
//! | WARNING  | `WARN`        |
//! | ERROR    | `ERROR`       |
//! | FATAL    | `ERROR` with `fatal = true` |

use crate::severity::Severity;
use crate::structured::{SinkRecord, StructuredSink};

/// Target used for events emitted by [`TracingSink`].
pub const TRACING_TARGET: &str = "taglog";

/// [`StructuredSink`] backed by the `tracing` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Creates the sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl StructuredSink for TracingSink {
    fn log(&self, record: &SinkRecord<'_>) {
        let SinkRecord {
            severity,
            tag,
            message,
            file,
            line,
            depth,
        } = *record;
        match severity {
            Severity::Info => {
                tracing::info!(target: "taglog", tag, file, line, depth, "{message}");
            }
            Severity::Warning => {
                tracing::warn!(target: "taglog", tag, file, line, depth, "{message}");
            }
            Severity::Error => {
                tracing::error!(target: "taglog", tag, file, line, depth, "{message}");
            }
            Severity::Fatal => {
                tracing::error!(target: "taglog", tag, file, line, depth, fatal = true, "{message}");
            }
        }
    }
}
