#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging/src/lib.rs
//!
//! # Overview
//!
//! `taglog` is a severity-leveled logging facade whose records carry a
//! caller-supplied classification tag. Each record is rendered with a fixed
//! header and routed either to severity-tiered text outputs or, when one is
//! configured, to a structured sink.
//!
//! ```text
//! 2024-03-05 06:07:08.009 UTC    4321 [E] conn.rs:42] net: connection reset
//! ```
//!
//! # Design
//!
//! - [`Logger`] owns the configuration snapshot, the text output, a
//!   [`BufferPool`] of scratch buffers and a [`Clock`]. All entry points
//!   funnel into the same path: resolve the caller, render the header, append
//!   the message, dispatch.
//! - Caller attribution uses `#[track_caller]`; the [`caller`] module
//!   documents how wrapping helpers keep the reported location correct.
//! - Text outputs implement [`RecordOutput`](taglog_sink::RecordOutput) from
//!   `taglog-sink` and cascade every record into each lower-severity stream.
//! - Configuration lives in an immutable [`LoggingConfig`] swapped atomically
//!   through [`Logger::set_config`]; changes apply from the next call.
//!
//! The free functions ([`info_tag`](fn@info_tag), [`error_tagf`](fn@error_tagf), ...)
//! and the macros of the same family operate on the process-wide logger
//! returned by [`logger`].
//!
//! # Invariants
//!
//! - Logging calls never return errors and never panic on poisoned locks.
//! - Every text record ends with exactly the newline its call shape demands.
//! - With `skip_headers`, no clock or pid work is done.
//!
//! # Feature flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`HeaderOptions`] and the
//!   severity model.
//! - `tracing`: the `TagLayer` bridge from `tracing` events, the
//!   `TracingSink` structured sink, and `tracing` diagnostics on
//!   configuration changes.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use taglog::{FixedClock, Logger};
//! use taglog_sink::{MemoryLog, Severity};
//! use time::macros::datetime;
//!
//! let log = Arc::new(MemoryLog::new());
//! let logger = Logger::new(Arc::clone(&log))
//!     .with_clock(FixedClock(datetime!(2024-03-05 06:07:08.009 UTC)))
//!     .with_pid(4321);
//!
//! logger.warning_tagf("disk", format_args!("{}% used", 91));
//!
//! let warning = log.contents(Severity::Warning);
//! assert!(warning.starts_with("2024-03-05 06:07:08.009 UTC    4321 [W] "));
//! assert!(warning.ends_with("] disk: 91% used\n"));
//! assert_eq!(log.contents(Severity::Info), warning);
//! ```

mod api;
mod buffer_pool;
pub mod caller;
mod clock;
mod config;
mod dispatcher;
mod header;
mod macros;
mod numbers;
mod tag;
#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use api::{
    error_tag, error_tag_depth, error_tag_ln, error_tagf, info_tag, info_tag_depth, info_tag_ln,
    info_tagf, install, logger, warning_tag, warning_tag_depth, warning_tag_ln, warning_tagf,
};
pub use buffer_pool::{
    Buffer, BufferPool, DEFAULT_BUFFER_CAPACITY, DEFAULT_MAX_BUFFERS, MAX_RETAINED_CAPACITY,
    TMP_LEN,
};
pub use caller::{CallerFrame, trim_file};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, ConfigHandle, HeaderOptions, LoggingConfig};
pub use dispatcher::Logger;
pub use header::{PID_WIDTH, format_header};
pub use tag::Tag;
pub use taglog_sink::{
    CollectingSink, MemoryLog, RecordOutput, Severity, SharedBuffer, SinkRecord, StreamSet,
    StructuredSink,
};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{IGNORED_TARGET_PREFIX, TagLayer, init_tracing, init_tracing_with_filter};
#[cfg(feature = "tracing")]
pub use taglog_sink::TracingSink;
