#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! crates/logging-sink/src/lib.rs
//!
//! # Overview
//!
//! `taglog-sink` holds the output side of the tagged logging facade: the
//! ordered [`Severity`] model, destinations for rendered text records, and the
//! [`StructuredSink`] capability used when a structured backend owns
//! presentation.
//!
//! # Design
//!
//! Text records are delivered through [`RecordOutput`]. Every implementation
//! makes a record visible in its own severity stream and in every lower one:
//!
//! - [`StreamSet`] fans a record out to writers subscribed by minimum
//!   severity (for example one file per severity, or standard error).
//! - [`MemoryLog`] stores each record once and derives per-severity views on
//!   demand, which is what tests usually want to inspect.
//!
//! Structured backends implement [`StructuredSink`] and receive one
//! [`SinkRecord`] per call without the text header. With the `tracing`
//! feature, [`TracingSink`] forwards records to `tracing` events.
//!
//! # Invariants
//!
//! - Bytes of a single record are written with one `write_all` per stream
//!   while that stream's lock is held, so concurrent records never interleave.
//! - Lock poisoning never turns into a panic on the logging path.
//!
//! # Examples
//!
//! ```
//! use taglog_sink::{RecordOutput, Severity, SharedBuffer, StreamSet};
//!
//! let [info, warning, error, fatal] = std::array::from_fn(|_| SharedBuffer::new());
//! let streams = StreamSet::tiered([info.clone(), warning.clone(), error.clone(), fatal.clone()]);
//!
//! streams.write_record(Severity::Error, b"E boom\n")?;
//! assert_eq!(info.contents_string(), "E boom\n");
//! assert_eq!(warning.contents_string(), "E boom\n");
//! assert_eq!(error.contents_string(), "E boom\n");
//! assert!(fatal.contents().is_empty());
//! # Ok::<(), std::io::Error>(())
//! ```

mod memory;
mod output;
mod severity;
mod streams;
mod structured;
#[cfg(feature = "tracing")]
mod tracing_sink;

pub use memory::MemoryLog;
pub use output::{Discard, RecordOutput, report_write_failure};
pub use severity::{ParseSeverityError, Severity};
pub use streams::{SharedBuffer, StreamSet};
pub use structured::{CollectingSink, OwnedSinkRecord, SinkRecord, StructuredSink};
#[cfg(feature = "tracing")]
pub use tracing_sink::{TRACING_TARGET, TracingSink};
