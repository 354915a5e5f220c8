//! crates/logging/src/tracing_bridge.rs
//! Bridge from the tracing crate into the tagged logger.
//!
//! [`TagLayer`] is a `tracing-subscriber` layer that turns every event into a
//! tagged record:
//!
//! - the event target becomes the tag,
//! - `ERROR` maps to [`Severity::Error`], `WARN` to [`Severity::Warning`], and
//!   every other level to [`Severity::Info`],
//! - the file and line come from the event metadata,
//! - the `message` field becomes the message, followed by any other fields
//!   as `name=value`.
//!
//! Events whose target starts with `taglog` are ignored, which keeps a
//! [`TracingSink`](taglog_sink::TracingSink) from feeding its own events back
//! into the logger.
//!
//! # Usage
//!
//! ```rust,ignore
//! taglog::init_tracing()?;
//!
//! tracing::warn!(target: "net", "retrying in {}s", 5);
//! ```

use std::fmt::{self, Write as _};
use std::sync::Arc;

use taglog_sink::Severity;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::TryInitError;

use crate::dispatcher::{Logger, Message};
use crate::tag::Tag;

/// Target prefix of events the bridge never forwards.
pub const IGNORED_TARGET_PREFIX: &str = "taglog";

/// A tracing layer that forwards events to a [`Logger`].
pub struct TagLayer {
    logger: Option<Arc<Logger>>,
}

impl TagLayer {
    /// Creates a layer forwarding to `logger`.
    #[must_use]
    pub fn new(logger: Arc<Logger>) -> Self {
        Self {
            logger: Some(logger),
        }
    }

    /// Creates a layer forwarding to the process-wide logger.
    #[must_use]
    pub const fn global() -> Self {
        Self { logger: None }
    }

    fn logger(&self) -> &Logger {
        self.logger.as_deref().unwrap_or_else(|| crate::logger())
    }

    /// Map a tracing level to a severity.
    const fn severity_for(level: &Level) -> Severity {
        match *level {
            Level::ERROR => Severity::Error,
            Level::WARN => Severity::Warning,
            _ => Severity::Info,
        }
    }
}

impl fmt::Debug for TagLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagLayer")
            .field("global", &self.logger.is_none())
            .finish()
    }
}

impl<S> Layer<S> for TagLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        if target.starts_with(IGNORED_TARGET_PREFIX) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        self.logger().log_at(
            Self::severity_for(metadata.level()),
            Tag::new(target),
            metadata.file(),
            metadata.line(),
            Message::Printf(format_args!("{}", visitor.finish())),
        );
    }
}

/// Visitor collecting the message and remaining fields of an event.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(mut self) -> String {
        if self.message.is_empty() {
            return self.fields.trim_start().to_owned();
        }
        self.message.push_str(&self.fields);
        self.message
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }
}

/// Installs a global subscriber feeding tracing events to the process-wide
/// logger.
pub fn init_tracing() -> Result<(), TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry().with(TagLayer::global()).try_init()
}

/// Like [`init_tracing`], with an additional filter layer such as
/// `tracing_subscriber::EnvFilter`.
///
/// ```rust,ignore
/// use tracing_subscriber::EnvFilter;
///
/// // RUST_LOG=warn,net=info
/// taglog::init_tracing_with_filter(EnvFilter::from_default_env())?;
/// ```
pub fn init_tracing_with_filter<F>(filter: F) -> Result<(), TryInitError>
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(filter)
        .with(TagLayer::global())
        .try_init()
}
