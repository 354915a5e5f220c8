//! crates/logging-sink/src/structured.rs
//! Capability interface for structured logging backends.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::severity::Severity;

/// A single record handed to a [`StructuredSink`].
///
/// The message never carries the text header: a structured backend owns its
/// own presentation, so the facade only supplies the raw pieces.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SinkRecord<'a> {
    /// Severity the record was logged at.
    pub severity: Severity,
    /// Caller-supplied classification tag.
    pub tag: &'a str,
    /// User message without the trailing newline.
    pub message: &'a str,
    /// Trimmed source file name of the call site.
    pub file: &'a str,
    /// Source line of the call site.
    pub line: u32,
    /// Logical call depth requested by the caller.
    pub depth: usize,
}

/// Structured logging backend.
///
/// When a sink is configured it receives exactly one call per log record and
/// is responsible for any severity fan-out it wants to provide. Logging never
/// fails from the caller's perspective, so the method has no error channel;
/// implementations handle their own delivery problems.
pub trait StructuredSink: Send + Sync {
    /// Accepts one record.
    fn log(&self, record: &SinkRecord<'_>);
}

impl<T> StructuredSink for Arc<T>
where
    T: StructuredSink + ?Sized,
{
    fn log(&self, record: &SinkRecord<'_>) {
        (**self).log(record);
    }
}

/// Owned copy of a [`SinkRecord`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnedSinkRecord {
    /// Severity the record was logged at.
    pub severity: Severity,
    /// Caller-supplied classification tag.
    pub tag: String,
    /// User message without the trailing newline.
    pub message: String,
    /// Trimmed source file name of the call site.
    pub file: String,
    /// Source line of the call site.
    pub line: u32,
    /// Logical call depth requested by the caller.
    pub depth: usize,
}

impl From<&SinkRecord<'_>> for OwnedSinkRecord {
    fn from(record: &SinkRecord<'_>) -> Self {
        Self {
            severity: record.severity,
            tag: record.tag.to_owned(),
            message: record.message.to_owned(),
            file: record.file.to_owned(),
            line: record.line,
            depth: record.depth,
        }
    }
}

/// Sink that keeps every record in memory.
#[derive(Default)]
pub struct CollectingSink {
    records: Mutex<Vec<OwnedSinkRecord>>,
}

impl CollectingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the collected records.
    #[must_use]
    pub fn records(&self) -> Vec<OwnedSinkRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns the collected records.
    pub fn drain(&self) -> Vec<OwnedSinkRecord> {
        std::mem::take(&mut *self.records.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl fmt::Debug for CollectingSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectingSink")
            .field("records", &self.records().len())
            .finish()
    }
}

impl StructuredSink for CollectingSink {
    fn log(&self, record: &SinkRecord<'_>) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(OwnedSinkRecord::from(record));
    }
}
