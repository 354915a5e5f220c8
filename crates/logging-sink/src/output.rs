//! crates/logging-sink/src/output.rs
//! Destination trait for fully rendered text records.

use std::io::{self, Write};
use std::sync::Arc;

use crate::severity::Severity;

/// Destination for rendered text records.
///
/// A record handed to [`write_record`](Self::write_record) carries the
/// severity it was logged at. Implementations must make the record visible at
/// that severity and at every lower one, and must keep the bytes of one record
/// contiguous even when several threads write concurrently.
pub trait RecordOutput: Send + Sync {
    /// Writes one complete record, cascading it into lower-severity streams.
    fn write_record(&self, severity: Severity, record: &[u8]) -> io::Result<()>;

    /// Flushes buffered data, if any.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

impl<T> RecordOutput for Arc<T>
where
    T: RecordOutput + ?Sized,
{
    fn write_record(&self, severity: Severity, record: &[u8]) -> io::Result<()> {
        (**self).write_record(severity, record)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Output that discards every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct Discard;

impl RecordOutput for Discard {
    fn write_record(&self, _severity: Severity, _record: &[u8]) -> io::Result<()> {
        Ok(())
    }
}

/// Reports a failed record write on standard error.
///
/// This is the last-resort channel for outputs that cannot deliver a record;
/// failures while reporting are ignored because there is nowhere left to send
/// them.
pub fn report_write_failure(severity: Severity, error: &io::Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(
        stderr,
        "taglog: failed to write {} record: {error}",
        severity.name()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discard_accepts_every_severity() {
        for severity in Severity::ALL {
            assert!(Discard.write_record(severity, b"dropped\n").is_ok());
        }
        assert!(Discard.flush().is_ok());
    }

    #[test]
    fn arc_forwards_to_inner_output() {
        let output: Arc<dyn RecordOutput> = Arc::new(Discard);
        assert!(output.write_record(Severity::Error, b"x\n").is_ok());
    }
}
