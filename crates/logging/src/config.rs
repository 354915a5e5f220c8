//! crates/logging/src/config.rs
//! Runtime configuration snapshots for the dispatcher.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use taglog_sink::StructuredSink;
use thiserror::Error;

/// Options controlling the text header.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HeaderOptions {
    /// Emit message-only records without any header.
    pub skip_headers: bool,
    /// Keep the parent directory in the file name (`net/conn.rs`).
    pub add_dir_header: bool,
}

impl HeaderOptions {
    /// Apply a single option token (e.g., `"skip_headers"`, `"add_dir_header=false"`).
    ///
    /// A bare name enables the option. Values accept `true`/`false` and `1`/`0`.
    pub fn apply_flag(&mut self, token: &str) -> Result<(), ConfigError> {
        let (name, value) = parse_flag_token(token)?;
        match name {
            "skip_headers" => self.skip_headers = value,
            "add_dir_header" => self.add_dir_header = value,
            _ => return Err(ConfigError::UnknownOption(name.to_owned())),
        }
        Ok(())
    }
}

/// Error returned when a configuration token cannot be applied.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConfigError {
    /// The token was empty.
    #[error("empty configuration token")]
    EmptyToken,
    /// The option name is not recognised.
    #[error("unknown logging option: {0}")]
    UnknownOption(String),
    /// The option value is not a boolean.
    #[error("invalid value for logging option {name}: {value}")]
    InvalidValue {
        /// Option name.
        name: String,
        /// Rejected value.
        value: String,
    },
}

fn parse_flag_token(token: &str) -> Result<(&str, bool), ConfigError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ConfigError::EmptyToken);
    }

    let Some((name, raw)) = token.split_once('=') else {
        return Ok((token, true));
    };
    let name = name.trim();
    let value = match raw.trim() {
        "true" | "1" => true,
        "false" | "0" => false,
        other => {
            return Err(ConfigError::InvalidValue {
                name: name.to_owned(),
                value: other.to_owned(),
            });
        }
    };
    Ok((name, value))
}

/// Complete dispatcher configuration.
///
/// Instances are immutable once published through a [`ConfigHandle`]; changing
/// the configuration means building a new value and swapping it in.
#[derive(Clone, Default)]
pub struct LoggingConfig {
    header: HeaderOptions,
    sink: Option<Arc<dyn StructuredSink>>,
}

impl LoggingConfig {
    /// Creates the default configuration: headers on, no parent directory, no
    /// structured sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the header options.
    pub fn with_header_options(mut self, header: HeaderOptions) -> Self {
        self.header = header;
        self
    }

    /// Enables or disables message-only records.
    pub fn with_skip_headers(mut self, skip_headers: bool) -> Self {
        self.header.skip_headers = skip_headers;
        self
    }

    /// Enables or disables the parent directory in file names.
    pub fn with_add_dir_header(mut self, add_dir_header: bool) -> Self {
        self.header.add_dir_header = add_dir_header;
        self
    }

    /// Routes records to a structured sink instead of the text outputs.
    pub fn with_sink(mut self, sink: Arc<dyn StructuredSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Restores the text output path.
    pub fn without_sink(mut self) -> Self {
        self.sink = None;
        self
    }

    /// Returns the header options.
    #[must_use]
    pub const fn header(&self) -> HeaderOptions {
        self.header
    }

    /// Reports whether headers are skipped.
    #[must_use]
    pub const fn skip_headers(&self) -> bool {
        self.header.skip_headers
    }

    /// Reports whether file names keep their parent directory.
    #[must_use]
    pub const fn add_dir_header(&self) -> bool {
        self.header.add_dir_header
    }

    /// Returns the structured sink, if one is configured.
    #[must_use]
    pub fn sink(&self) -> Option<&Arc<dyn StructuredSink>> {
        self.sink.as_ref()
    }
}

impl fmt::Debug for LoggingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingConfig")
            .field("header", &self.header)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

/// Shared, swappable configuration snapshot.
///
/// Readers clone the current [`Arc`] under a short read lock and keep using
/// that snapshot for the rest of their call, so a concurrent swap never
/// changes the configuration half-way through a record.
#[derive(Debug, Default)]
pub struct ConfigHandle {
    current: RwLock<Arc<LoggingConfig>>,
}

impl ConfigHandle {
    /// Creates a handle publishing `config`.
    #[must_use]
    pub fn new(config: LoggingConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn load(&self) -> Arc<LoggingConfig> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Publishes `config` and returns the previous snapshot.
    pub fn store(&self, config: LoggingConfig) -> Arc<LoggingConfig> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *current, Arc::new(config));
        drop(current);
        trace_config_change(&previous, &self.load());
        previous
    }

    /// Builds a new snapshot from the current one and publishes it.
    ///
    /// The write lock is held while `f` runs, so concurrent updates are
    /// applied one after the other.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(LoggingConfig) -> LoggingConfig,
    {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let previous = Arc::clone(&current);
        *current = Arc::new(f(LoggingConfig::clone(&previous)));
        let next = Arc::clone(&current);
        drop(current);
        trace_config_change(&previous, &next);
    }
}

#[cfg(feature = "tracing")]
fn trace_config_change(previous: &LoggingConfig, next: &LoggingConfig) {
    tracing::debug!(
        target: "taglog::config",
        skip_headers = next.skip_headers(),
        add_dir_header = next.add_dir_header(),
        sink = next.sink().is_some(),
        previous_sink = previous.sink().is_some(),
        "logging configuration replaced"
    );
}

#[cfg(not(feature = "tracing"))]
fn trace_config_change(_previous: &LoggingConfig, _next: &LoggingConfig) {}
