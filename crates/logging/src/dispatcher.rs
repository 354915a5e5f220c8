//! crates/logging/src/dispatcher.rs
//! Record assembly and routing.
//!
//! Every logging call follows the same path:
//!
//! 1. Snapshot the configuration.
//! 2. Resolve the caller frame and render the header into a pooled buffer.
//! 3. With a structured sink configured, swap the header buffer for a fresh
//!    one; the sink owns presentation.
//! 4. Append the message according to the call shape.
//! 5. Hand the record to the sink once, or to the text output, which cascades
//!    it into every lower-severity stream.
//! 6. Return the buffer to the pool.

use std::fmt::{self, Display, Write as _};
use std::io;
use std::panic::Location;
use std::sync::{Arc, PoisonError, RwLock};

use taglog_sink::{RecordOutput, Severity, SinkRecord, StreamSet, report_write_failure};

use crate::buffer_pool::{Buffer, BufferPool};
use crate::caller::{self, CallerFrame};
use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigHandle, LoggingConfig};
use crate::header::format_header;
use crate::tag::Tag;

/// Message body of a single call.
#[derive(Clone, Copy)]
pub(crate) enum Message<'a> {
    /// Arguments joined by one space; newline added when missing.
    Print(&'a [&'a dyn Display]),
    /// Arguments joined by one space; newline always added.
    Println(&'a [&'a dyn Display]),
    /// Preformatted arguments; newline added when missing.
    Printf(fmt::Arguments<'a>),
}

impl Message<'_> {
    fn append_to(self, buffer: &mut Buffer) {
        match self {
            Self::Print(args) => {
                join_args(buffer, args);
                buffer.ensure_trailing_newline();
            }
            Self::Println(args) => {
                join_args(buffer, args);
                buffer.push(b'\n');
            }
            Self::Printf(args) => {
                // A failing Display impl truncates the message; the record is
                // still written.
                let _ = buffer.write_fmt(args);
                buffer.ensure_trailing_newline();
            }
        }
    }
}

fn join_args(buffer: &mut Buffer, args: &[&dyn Display]) {
    for (index, arg) in args.iter().enumerate() {
        if index > 0 {
            buffer.push(b' ');
        }
        let _ = write!(buffer, "{arg}");
    }
}

/// Tagged record formatter and dispatcher.
///
/// A `Logger` owns its outputs, configuration snapshot, buffer pool and clock.
/// It can be injected wherever a non-global logger is wanted; the free
/// functions in the crate root operate on the process-wide instance returned
/// by [`logger`](crate::logger).
///
/// Logging methods never fail. Output write errors are reported on standard
/// error and otherwise ignored.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use taglog::{Logger, LoggingConfig};
/// use taglog_sink::{MemoryLog, Severity};
///
/// let log = Arc::new(MemoryLog::new());
/// let logger = Logger::new(Arc::clone(&log))
///     .with_config(LoggingConfig::new().with_skip_headers(true));
///
/// logger.error_tag("db", &[&"connection", &"lost"]);
///
/// assert_eq!(log.contents(Severity::Info), "connection lost\n");
/// assert_eq!(log.contents(Severity::Error), "connection lost\n");
/// assert_eq!(log.contents(Severity::Fatal), "");
/// ```
pub struct Logger {
    config: ConfigHandle,
    output: RwLock<Arc<dyn RecordOutput>>,
    pool: BufferPool,
    clock: Arc<dyn Clock>,
    pid: u32,
}

macro_rules! severity_methods {
    (
        $severity:expr,
        $name:literal,
        $print:ident,
        $println:ident,
        $printf:ident,
        $depth:ident $(,)?
    ) => {
        #[doc = concat!("Logs `args` at ", $name, ", joined by spaces.")]
        ///
        /// A trailing newline is added unless the message already ends with one.
        #[track_caller]
        pub fn $print<'t>(&self, tag: impl Into<Tag<'t>>, args: &[&dyn Display]) {
            self.emit($severity, 0, tag.into(), Message::Print(args));
        }

        #[doc = concat!("Logs `args` at ", $name, ", joined by spaces, always followed by a newline.")]
        #[track_caller]
        pub fn $println<'t>(&self, tag: impl Into<Tag<'t>>, args: &[&dyn Display]) {
            self.emit($severity, 0, tag.into(), Message::Println(args));
        }

        #[doc = concat!("Logs preformatted `args` at ", $name, ".")]
        ///
        /// A trailing newline is added unless the message already ends with one.
        #[track_caller]
        pub fn $printf<'t>(&self, tag: impl Into<Tag<'t>>, args: fmt::Arguments<'_>) {
            self.emit($severity, 0, tag.into(), Message::Printf(args));
        }

        #[doc = concat!("Logs `args` at ", $name, " on behalf of a wrapping helper.")]
        ///
        /// `depth` counts frames above the caller of this method, so a plain
        /// helper passes `1` to attribute the record to its own caller; see
        /// the [depth contract](crate::caller).
        #[track_caller]
        pub fn $depth<'t>(&self, depth: usize, tag: impl Into<Tag<'t>>, args: &[&dyn Display]) {
            self.emit($severity, depth, tag.into(), Message::Print(args));
        }
    };
}

impl Logger {
    /// Creates a logger writing text records to `output`.
    ///
    /// The logger uses the default configuration, the local wall clock and
    /// the current process id.
    pub fn new<O>(output: O) -> Self
    where
        O: RecordOutput + 'static,
    {
        Self {
            config: ConfigHandle::default(),
            output: RwLock::new(Arc::new(output)),
            pool: BufferPool::default(),
            clock: Arc::new(SystemClock::local()),
            pid: std::process::id(),
        }
    }

    /// Creates a logger writing every record to standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(StreamSet::stderr())
    }

    /// Replaces the initial configuration.
    pub fn with_config(self, config: LoggingConfig) -> Self {
        self.config.store(config);
        self
    }

    /// Replaces the clock used for header timestamps.
    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Replaces the process id written into headers.
    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = pid;
        self
    }

    /// Replaces the buffer pool.
    pub fn with_buffer_pool(mut self, pool: BufferPool) -> Self {
        self.pool = pool;
        self
    }

    /// Returns the process id written into headers.
    #[must_use]
    pub const fn pid(&self) -> u32 {
        self.pid
    }

    /// Returns the current configuration snapshot.
    #[must_use]
    pub fn config(&self) -> Arc<LoggingConfig> {
        self.config.load()
    }

    /// Publishes a new configuration and returns the previous one.
    ///
    /// The change applies from the next logging call on.
    pub fn set_config(&self, config: LoggingConfig) -> Arc<LoggingConfig> {
        self.config.store(config)
    }

    /// Derives a new configuration from the current one and publishes it.
    pub fn update_config<F>(&self, f: F)
    where
        F: FnOnce(LoggingConfig) -> LoggingConfig,
    {
        self.config.update(f);
    }

    /// Replaces the text output and returns the previous one.
    pub fn swap_output(&self, output: Arc<dyn RecordOutput>) -> Arc<dyn RecordOutput> {
        let mut current = self.output.write().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *current, output);
        drop(current);
        #[cfg(feature = "tracing")]
        tracing::debug!(target: "taglog::config", "text output replaced");
        previous
    }

    /// Flushes the text output.
    pub fn flush(&self) -> io::Result<()> {
        self.output().flush()
    }

    /// Renders the header for `tag`, `severity`, `file` and `line` into a
    /// pooled buffer.
    ///
    /// With `skip_headers` configured the buffer is returned empty without
    /// reading the clock. Hand the buffer back through
    /// [`release_buffer`](Self::release_buffer) when done.
    #[must_use]
    pub fn format_header_tag<'t>(
        &self,
        tag: impl Into<Tag<'t>>,
        severity: Severity,
        file: &str,
        line: i64,
    ) -> Buffer {
        let config = self.config.load();
        self.header_buffer(&config, tag.into(), severity, file, line)
    }

    /// Returns a buffer obtained from [`format_header_tag`](Self::format_header_tag)
    /// to the pool.
    pub fn release_buffer(&self, buffer: Buffer) {
        self.pool.release(buffer);
    }

    /// Logs `args` at a raw severity level, joined by spaces.
    ///
    /// Levels outside the defined range are logged at [`Severity::Info`].
    #[track_caller]
    pub fn log_level<'t>(&self, level: i64, tag: impl Into<Tag<'t>>, args: &[&dyn Display]) {
        self.emit(Severity::clamp(level), 0, tag.into(), Message::Print(args));
    }

    severity_methods!(
        Severity::Info,
        "INFO",
        info_tag,
        info_tag_ln,
        info_tagf,
        info_tag_depth,
    );

    severity_methods!(
        Severity::Warning,
        "WARNING",
        warning_tag,
        warning_tag_ln,
        warning_tagf,
        warning_tag_depth,
    );

    severity_methods!(
        Severity::Error,
        "ERROR",
        error_tag,
        error_tag_ln,
        error_tagf,
        error_tag_depth,
    );

    #[track_caller]
    fn emit(&self, severity: Severity, depth: usize, tag: Tag<'_>, message: Message<'_>) {
        let config = self.config.load();
        let frame = caller::resolve_depth(Location::caller(), depth, config.add_dir_header());
        self.dispatch(&config, severity, depth, tag, frame, message);
    }

    /// Logs a record whose source location comes from elsewhere, such as
    /// event metadata. Missing locations degrade to the unresolved frame.
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) fn log_at(
        &self,
        severity: Severity,
        tag: Tag<'_>,
        file: Option<&str>,
        line: Option<u32>,
        message: Message<'_>,
    ) {
        let config = self.config.load();
        let frame = CallerFrame::from_parts(file, line, config.add_dir_header());
        self.dispatch(&config, severity, 0, tag, frame, message);
    }

    fn dispatch(
        &self,
        config: &LoggingConfig,
        severity: Severity,
        depth: usize,
        tag: Tag<'_>,
        frame: CallerFrame<'_>,
        message: Message<'_>,
    ) {
        let mut buffer =
            self.header_buffer(config, tag, severity, frame.file(), i64::from(frame.line()));

        match config.sink() {
            Some(sink) => {
                self.pool.release(buffer);
                buffer = self.pool.acquire();
                message.append_to(&mut buffer);

                let text = String::from_utf8_lossy(buffer.as_bytes());
                sink.log(&SinkRecord {
                    severity,
                    tag: tag.as_str(),
                    message: text.strip_suffix('\n').unwrap_or(&text),
                    file: frame.file(),
                    line: frame.line(),
                    depth,
                });
            }
            None => {
                message.append_to(&mut buffer);
                if let Err(error) = self.output().write_record(severity, buffer.as_bytes()) {
                    report_write_failure(severity, &error);
                }
            }
        }

        self.pool.release(buffer);
    }

    fn header_buffer(
        &self,
        config: &LoggingConfig,
        tag: Tag<'_>,
        severity: Severity,
        file: &str,
        line: i64,
    ) -> Buffer {
        let mut buffer = self.pool.acquire();
        if config.skip_headers() {
            return buffer;
        }
        format_header(&mut buffer, self.clock.now(), self.pid, tag, severity, file, line);
        buffer
    }

    fn output(&self) -> Arc<dyn RecordOutput> {
        Arc::clone(&self.output.read().unwrap_or_else(PoisonError::into_inner))
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("config", &self.config.load())
            .field("pool", &self.pool)
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use taglog_sink::{CollectingSink, MemoryLog};
    use time::macros::datetime;

    struct FailingOutput;

    impl RecordOutput for FailingOutput {
        fn write_record(&self, _severity: Severity, _record: &[u8]) -> io::Result<()> {
            Err(io::Error::other("disk full"))
        }
    }

    struct CountingClock(AtomicUsize);

    impl Clock for CountingClock {
        fn now(&self) -> time::OffsetDateTime {
            self.0.fetch_add(1, Ordering::SeqCst);
            datetime!(2024-03-05 06:07:08 UTC)
        }
    }

    fn frozen_logger(log: &Arc<MemoryLog>) -> Logger {
        Logger::new(Arc::clone(log))
            .with_clock(FixedClock(datetime!(2024-03-05 06:07:08.009 UTC)))
            .with_pid(4321)
    }

    #[test]
    fn print_adds_missing_newline_only() {
        let log = Arc::new(MemoryLog::new());
        let logger = frozen_logger(&log).with_config(LoggingConfig::new().with_skip_headers(true));

        logger.info_tag("T", &[&"a", &1, &'c']);
        logger.info_tag("T", &[&"done\n"]);

        assert_eq!(log.contents(Severity::Info), "a 1 c\ndone\n");
    }

    #[test]
    fn println_always_appends_newline() {
        let log = Arc::new(MemoryLog::new());
        let logger = frozen_logger(&log).with_config(LoggingConfig::new().with_skip_headers(true));

        logger.info_tag_ln("T", &[&"x", &"y"]);
        logger.info_tag_ln("T", &[&"z\n"]);

        assert_eq!(log.contents(Severity::Info), "x y\nz\n\n");
    }

    #[test]
    fn printf_adds_missing_newline_only() {
        let log = Arc::new(MemoryLog::new());
        let logger = frozen_logger(&log).with_config(LoggingConfig::new().with_skip_headers(true));

        logger.warning_tagf("T", format_args!("{}-{}", 1, 2));
        logger.warning_tagf("T", format_args!("end\n"));

        assert_eq!(log.contents(Severity::Warning), "1-2\nend\n");
    }

    #[test]
    fn empty_message_still_ends_with_newline() {
        let log = Arc::new(MemoryLog::new());
        let logger = frozen_logger(&log).with_config(LoggingConfig::new().with_skip_headers(true));

        logger.info_tag("T", &[]);

        assert_eq!(log.contents(Severity::Info), "\n");
    }

    #[test]
    fn text_record_carries_header_and_message() {
        let log = Arc::new(MemoryLog::new());
        let logger = frozen_logger(&log);

        let line = line!() + 1;
        logger.error_tag("TestTAG", &[&"test"]);

        let expected = format!(
            "2024-03-05 06:07:08.009 UTC    4321 [E] dispatcher.rs:{line}] TestTAG: test\n"
        );
        assert_eq!(log.contents(Severity::Error), expected);
        assert_eq!(log.contents(Severity::Warning), expected);
        assert_eq!(log.contents(Severity::Info), expected);
        assert_eq!(log.contents(Severity::Fatal), "");
    }

    #[test]
    fn add_dir_header_keeps_parent_directory() {
        let log = Arc::new(MemoryLog::new());
        let logger = frozen_logger(&log).with_config(LoggingConfig::new().with_add_dir_header(true));

        logger.info_tag("T", &[&"m"]);

        assert!(log.contents(Severity::Info).contains(" src/dispatcher.rs:"));
    }

    #[test]
    fn raw_levels_are_clamped() {
        let log = Arc::new(MemoryLog::new());
        let logger = frozen_logger(&log);

        logger.log_level(17, "T", &[&"too high"]);
        logger.log_level(-3, "T", &[&"negative"]);
        logger.log_level(3, "T", &[&"fatal"]);

        let records = log.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].0, Severity::Info);
        assert_eq!(records[1].0, Severity::Info);
        assert_eq!(records[2].0, Severity::Fatal);
        assert!(log.contents(Severity::Fatal).contains("[F] "));
    }

    #[test]
    fn skip_headers_never_reads_the_clock() {
        let clock = Arc::new(CountingClock(AtomicUsize::new(0)));
        let log = Arc::new(MemoryLog::new());
        let logger = Logger::new(Arc::clone(&log))
            .with_clock(SharedClock(Arc::clone(&clock)))
            .with_config(LoggingConfig::new().with_skip_headers(true));

        let buffer = logger.format_header_tag("T", Severity::Info, "a.rs", 1);
        assert!(buffer.is_empty());
        logger.release_buffer(buffer);
        logger.info_tag("T", &[&"m"]);

        assert_eq!(clock.0.load(Ordering::SeqCst), 0);
    }

    struct SharedClock(Arc<CountingClock>);

    impl Clock for SharedClock {
        fn now(&self) -> time::OffsetDateTime {
            self.0.now()
        }
    }

    #[test]
    fn sink_receives_one_record_without_header() {
        let log = Arc::new(MemoryLog::new());
        let sink = Arc::new(CollectingSink::new());
        let logger = frozen_logger(&log).with_config(LoggingConfig::new().with_sink(sink.clone()));

        let line = line!() + 1;
        logger.error_tag_depth(0, "TestTAG", &[&"multi", &"word"]);

        assert!(log.is_empty());
        let records = sink.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.severity, Severity::Error);
        assert_eq!(record.tag, "TestTAG");
        assert_eq!(record.message, "multi word");
        assert_eq!(record.file, "dispatcher.rs");
        assert_eq!(record.line, line);
        assert_eq!(record.depth, 0);
    }

    #[test]
    fn sink_message_keeps_inner_newlines() {
        let sink = Arc::new(CollectingSink::new());
        let logger = Logger::new(MemoryLog::new())
            .with_config(LoggingConfig::new().with_sink(sink.clone()));

        logger.info_tag_ln("T", &[&"a\nb"]);

        assert_eq!(sink.records()[0].message, "a\nb");
    }

    #[test]
    fn removing_sink_restores_text_path() {
        let log = Arc::new(MemoryLog::new());
        let sink = Arc::new(CollectingSink::new());
        let logger = frozen_logger(&log).with_config(LoggingConfig::new().with_sink(sink.clone()));

        logger.info_tag("T", &[&"to sink"]);
        logger.update_config(LoggingConfig::without_sink);
        logger.info_tag("T", &[&"to text"]);

        assert_eq!(sink.records().len(), 1);
        assert!(log.contents(Severity::Info).ends_with("T: to text\n"));
    }

    #[test]
    fn write_failures_are_swallowed() {
        let logger = Logger::new(FailingOutput);
        logger.error_tag("T", &[&"lost"]);
        logger.warning_tagf("T", format_args!("also lost"));
    }

    #[test]
    fn swap_output_returns_previous_output() {
        let first = Arc::new(MemoryLog::new());
        let second = Arc::new(MemoryLog::new());
        let logger = frozen_logger(&first).with_config(LoggingConfig::new().with_skip_headers(true));

        logger.info_tag("T", &[&"one"]);
        let previous = logger.swap_output(second.clone());
        logger.info_tag("T", &[&"two"]);
        previous.write_record(Severity::Info, b"direct\n").expect("memory write");

        assert_eq!(first.contents(Severity::Info), "one\ndirect\n");
        assert_eq!(second.contents(Severity::Info), "two\n");
    }

    #[test]
    fn buffers_return_to_the_pool() {
        let log = Arc::new(MemoryLog::new());
        let logger = frozen_logger(&log);

        logger.info_tag("T", &[&"m"]);
        logger.info_tag("T", &[&"m"]);

        assert_eq!(logger.pool.available(), 1);
    }
}
