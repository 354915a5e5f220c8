//! crates/logging-sink/src/streams.rs
//! Severity-filtered writer subscribers.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use crate::output::RecordOutput;
use crate::severity::Severity;

struct Stream {
    min: Severity,
    writer: Mutex<Box<dyn Write + Send>>,
}

/// Set of writers, each subscribed to records at or above a minimum severity.
///
/// A writer subscribed at [`Severity::Info`] therefore sees every record,
/// while one subscribed at [`Severity::Error`] only sees errors and fatal
/// records. Registering one writer per severity reproduces the classic
/// INFO/WARNING/ERROR/FATAL log files where each file contains its own level
/// and everything above it.
///
/// Streams are kept ordered from the highest minimum severity to the lowest,
/// so a record reaches its own tier first and then cascades downward.
///
/// # Examples
///
/// ```
/// use taglog_sink::{RecordOutput, Severity, SharedBuffer, StreamSet};
///
/// let info = SharedBuffer::new();
/// let error = SharedBuffer::new();
/// let streams = StreamSet::new()
///     .with_stream(Severity::Info, info.clone())
///     .with_stream(Severity::Error, error.clone());
///
/// streams.write_record(Severity::Warning, b"disk almost full\n")?;
/// assert_eq!(info.contents_string(), "disk almost full\n");
/// assert!(error.contents().is_empty());
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Default)]
pub struct StreamSet {
    streams: Vec<Stream>,
}

impl StreamSet {
    /// Creates an empty set that drops every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set with standard error subscribed at [`Severity::Info`].
    #[must_use]
    pub fn stderr() -> Self {
        Self::new().with_stream(Severity::Info, io::stderr())
    }

    /// Creates one subscriber per severity from `writers`, indexed by
    /// [`Severity::index`].
    #[must_use]
    pub fn tiered<W>(writers: [W; 4]) -> Self
    where
        W: Write + Send + 'static,
    {
        Severity::ALL
            .into_iter()
            .zip(writers)
            .fold(Self::new(), |set, (min, writer)| set.with_stream(min, writer))
    }

    /// Adds a writer that receives records at or above `min`.
    #[must_use]
    pub fn with_stream<W>(mut self, min: Severity, writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        self.add_stream(min, writer);
        self
    }

    /// Adds a writer in place.
    pub fn add_stream<W>(&mut self, min: Severity, writer: W)
    where
        W: Write + Send + 'static,
    {
        let position = self
            .streams
            .iter()
            .position(|stream| stream.min < min)
            .unwrap_or(self.streams.len());
        self.streams.insert(
            position,
            Stream {
                min,
                writer: Mutex::new(Box::new(writer)),
            },
        );
    }

    /// Returns the number of registered writers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Reports whether no writer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

impl fmt::Debug for StreamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamSet")
            .field(
                "streams",
                &self.streams.iter().map(|s| s.min).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl RecordOutput for StreamSet {
    fn write_record(&self, severity: Severity, record: &[u8]) -> io::Result<()> {
        let mut first_error = None;
        for stream in self.streams.iter().filter(|stream| stream.min <= severity) {
            let mut writer = stream.writer.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(error) = writer.write_all(record) {
                first_error.get_or_insert(error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn flush(&self) -> io::Result<()> {
        let mut first_error = None;
        for stream in &self.streams {
            let mut writer = stream.writer.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(error) = writer.flush() {
                first_error.get_or_insert(error);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Cloneable in-memory writer.
///
/// Every clone appends to the same underlying byte vector, which makes the
/// type convenient for capturing what a [`StreamSet`] subscriber received.
#[derive(Clone, Debug, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the captured bytes.
    #[must_use]
    pub fn contents(&self) -> Vec<u8> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the captured bytes as text, replacing invalid UTF-8.
    #[must_use]
    pub fn contents_string(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }

    /// Discards everything captured so far.
    pub fn clear(&self) {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.write(buf).map(drop)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
