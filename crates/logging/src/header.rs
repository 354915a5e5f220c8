//! crates/logging/src/header.rs
//! Fixed-layout text header rendering.
//!
//! A header has the form
//!
//! ```text
//! 2024-03-05 06:07:08.009 UTC    4321 [I] conn.rs:42] net:
//! ```
//!
//! The timestamp is fixed width with millisecond precision, followed by the
//! zone (`UTC` or a numeric `+hhmm`/`-hhmm` offset). The pid occupies exactly
//! seven columns. Tooling greps this layout, so every field is written with
//! fixed separators.

use taglog_sink::Severity;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::buffer_pool::Buffer;
use crate::tag::Tag;

const TIMESTAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]");

/// Written in place of the timestamp if the clock reading cannot be rendered.
const UNRENDERABLE_TIMESTAMP: &str = "0000-00-00 00:00:00.000";

/// Width of the pid column.
pub const PID_WIDTH: usize = 7;

/// Appends the header for one record to `buffer`.
///
/// The zone is written as `UTC` for a zero offset. Any other offset is
/// written numerically as `+hhmm` or `-hhmm`, since the clock only carries an
/// offset and no zone abbreviation. Both forms keep the header width fixed
/// for a given offset.
///
/// Negative line numbers render as `0`. Numeric fields are assembled in the
/// buffer's temporary array rather than through `format!`.
pub fn format_header(
    buffer: &mut Buffer,
    now: OffsetDateTime,
    pid: u32,
    tag: Tag<'_>,
    severity: Severity,
    file: &str,
    line: i64,
) {
    write_timestamp(buffer, |buffer| now.format_into(buffer, TIMESTAMP));
    write_zone(buffer, now.offset());

    // " 1234567 [L] "
    buffer.set_tmp(0, b' ');
    buffer.n_digits(PID_WIDTH, 1, u64::from(pid), b' ');
    buffer.set_tmp(PID_WIDTH + 1, b' ');
    buffer.set_tmp(PID_WIDTH + 2, b'[');
    buffer.set_tmp(PID_WIDTH + 3, severity.letter());
    buffer.set_tmp(PID_WIDTH + 4, b']');
    buffer.set_tmp(PID_WIDTH + 5, b' ');
    buffer.write_tmp(PID_WIDTH + 6);

    buffer.push_str(file);

    // ":<line>] "
    let line = u64::try_from(line).unwrap_or(0);
    buffer.set_tmp(0, b':');
    let digits = buffer.some_digits(1, line);
    buffer.set_tmp(digits + 1, b']');
    buffer.set_tmp(digits + 2, b' ');
    buffer.write_tmp(digits + 3);

    buffer.push_str(tag.as_str());
    buffer.push_str(": ");
}

/// Runs `render`, replacing anything it wrote with the placeholder if it fails.
fn write_timestamp<F>(buffer: &mut Buffer, render: F)
where
    F: FnOnce(&mut Buffer) -> Result<usize, time::error::Format>,
{
    let start = buffer.len();
    if render(buffer).is_err() {
        buffer.truncate(start);
        buffer.push_str(UNRENDERABLE_TIMESTAMP);
    }
}

fn write_zone(buffer: &mut Buffer, offset: UtcOffset) {
    if offset.is_utc() {
        buffer.push_str(" UTC");
        return;
    }

    let sign = if offset.is_negative() { b'-' } else { b'+' };
    let hours = offset.whole_hours().unsigned_abs();
    let minutes = offset.minutes_past_hour().unsigned_abs();
    buffer.set_tmp(0, b' ');
    buffer.set_tmp(1, sign);
    buffer.n_digits(2, 2, u64::from(hours), b'0');
    buffer.n_digits(2, 4, u64::from(minutes), b'0');
    buffer.write_tmp(6);
}
