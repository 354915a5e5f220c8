//! crates/logging-sink/src/memory.rs
//! Append-only in-memory record log with per-severity views.

use std::io;
use std::sync::{Mutex, PoisonError};

use crate::output::RecordOutput;
use crate::severity::Severity;

/// Append-only sequence of `(severity, bytes)` records.
///
/// Instead of writing each record into several physical streams, the log
/// stores it once and derives the content of a severity stream on demand:
/// the view for a severity contains every record logged at that severity or
/// above, in arrival order. The result is byte-for-byte what a tiered
/// [`StreamSet`](crate::StreamSet) would have captured.
///
/// # Examples
///
/// ```
/// use taglog_sink::{MemoryLog, RecordOutput, Severity};
///
/// let log = MemoryLog::new();
/// log.write_record(Severity::Info, b"started\n")?;
/// log.write_record(Severity::Error, b"failed\n")?;
///
/// assert_eq!(log.contents(Severity::Info), "started\nfailed\n");
/// assert_eq!(log.contents(Severity::Warning), "failed\n");
/// assert_eq!(log.contents(Severity::Fatal), "");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct MemoryLog {
    records: Mutex<Vec<(Severity, Vec<u8>)>>,
}

impl MemoryLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the concatenated bytes visible in the `severity` stream.
    #[must_use]
    pub fn view(&self, severity: Severity) -> Vec<u8> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records
            .iter()
            .filter(|(logged, _)| *logged >= severity)
            .flat_map(|(_, bytes)| bytes.iter().copied())
            .collect()
    }

    /// Text form of [`view`](Self::view), replacing invalid UTF-8.
    #[must_use]
    pub fn contents(&self, severity: Severity) -> String {
        String::from_utf8_lossy(&self.view(severity)).into_owned()
    }

    /// Returns a copy of every stored record in arrival order.
    #[must_use]
    pub fn records(&self) -> Vec<(Severity, Vec<u8>)> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Reports whether no record has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every stored record.
    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl RecordOutput for MemoryLog {
    fn write_record(&self, severity: Severity, record: &[u8]) -> io::Result<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((severity, record.to_vec()));
        Ok(())
    }
}
