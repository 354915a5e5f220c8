//! crates/logging/src/clock.rs
//! Time source for header timestamps.

use std::fmt;

use time::{OffsetDateTime, UtcOffset};

/// Source of the timestamp written into text headers.
pub trait Clock: Send + Sync {
    /// Returns the current time in the offset headers should display.
    fn now(&self) -> OffsetDateTime;
}

/// Wall clock rendered in the local offset.
///
/// The local offset is looked up once at construction. The `time` crate
/// refuses the lookup when it cannot be done soundly (for example in a
/// multi-threaded process on some Unix platforms); the clock then falls back
/// to UTC.
#[derive(Clone, Copy)]
pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    /// Creates a clock using the current local offset, or UTC.
    #[must_use]
    pub fn local() -> Self {
        Self {
            offset: UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        }
    }

    /// Creates a clock rendering times in `offset`.
    #[must_use]
    pub const fn with_offset(offset: UtcOffset) -> Self {
        Self { offset }
    }

    /// Returns the offset applied to timestamps.
    #[must_use]
    pub const fn offset(&self) -> UtcOffset {
        self.offset
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::local()
    }
}

impl fmt::Debug for SystemClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemClock")
            .field("offset", &self.offset)
            .finish()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }
}

/// Clock frozen at a single instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    #[test]
    fn fixed_clock_never_moves() {
        let clock = FixedClock(datetime!(2024-03-05 06:07:08.009 UTC));
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn system_clock_applies_offset() {
        let clock = SystemClock::with_offset(offset!(+2));
        assert_eq!(clock.now().offset(), offset!(+2));
    }
}
