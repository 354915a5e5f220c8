//! crates/logging-sink/src/severity.rs
//! Ordered severity levels shared by headers, outputs and structured sinks.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Severity attached to a log record.
///
/// Severities are totally ordered from [`Severity::Info`] to
/// [`Severity::Fatal`]. A record logged at a given severity is also visible in
/// every stream of lower severity, so an error shows up in the warning and
/// info streams as well.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    /// Informational record.
    Info,
    /// Warning record.
    Warning,
    /// Error record.
    Error,
    /// Fatal record.
    Fatal,
}

impl Severity {
    /// All severities in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use taglog_sink::Severity;
    ///
    /// let letters: Vec<char> = Severity::ALL.iter().map(|s| char::from(s.letter())).collect();
    /// assert_eq!(letters, ['I', 'W', 'E', 'F']);
    /// ```
    pub const ALL: [Self; 4] = [Self::Info, Self::Warning, Self::Error, Self::Fatal];

    /// Highest defined severity.
    pub const MAX: Self = Self::Fatal;

    /// Returns the uppercase name used when rendering the severity.
    ///
    /// # Examples
    ///
    /// ```
    /// use taglog_sink::Severity;
    ///
    /// assert_eq!(Severity::Info.name(), "INFO");
    /// assert_eq!(Severity::Warning.name(), "WARNING");
    /// ```
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
        }
    }

    /// Returns the single-letter code written into text headers.
    #[must_use]
    pub const fn letter(self) -> u8 {
        match self {
            Self::Info => b'I',
            Self::Warning => b'W',
            Self::Error => b'E',
            Self::Fatal => b'F',
        }
    }

    /// Returns the position of the severity in [`Severity::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Maps a raw level onto a severity, falling back to [`Severity::Info`].
    ///
    /// Malformed levels never prevent logging: anything above
    /// [`Severity::MAX`] is treated as informational.
    ///
    /// # Examples
    ///
    /// ```
    /// use taglog_sink::Severity;
    ///
    /// assert_eq!(Severity::from_index(2), Severity::Error);
    /// assert_eq!(Severity::from_index(42), Severity::Info);
    /// ```
    #[must_use]
    pub const fn from_index(raw: usize) -> Self {
        match raw {
            1 => Self::Warning,
            2 => Self::Error,
            3 => Self::Fatal,
            _ => Self::Info,
        }
    }

    /// Signed variant of [`from_index`](Self::from_index).
    ///
    /// Negative levels are not part of the ordering either and map to
    /// [`Severity::Info`].
    #[must_use]
    pub fn clamp(raw: i64) -> Self {
        usize::try_from(raw).map_or(Self::Info, Self::from_index)
    }

    /// Iterates over this severity and every lower one, highest first.
    ///
    /// This is the fan-out order used when a record cascades into the
    /// lower-severity streams.
    ///
    /// # Examples
    ///
    /// ```
    /// use taglog_sink::Severity;
    ///
    /// let cascade: Vec<Severity> = Severity::Error.cascade().collect();
    /// assert_eq!(cascade, [Severity::Error, Severity::Warning, Severity::Info]);
    /// ```
    pub fn cascade(self) -> impl Iterator<Item = Self> {
        ORDER[..=self.index()].iter().rev().copied()
    }
}

static ORDER: [Severity; 4] = Severity::ALL;

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing a [`Severity`] from a string fails.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unrecognised log severity: {input}")]
pub struct ParseSeverityError {
    input: String,
}

impl ParseSeverityError {
    /// Returns the rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        Self::ALL
            .into_iter()
            .find(|severity| {
                trimmed.eq_ignore_ascii_case(severity.name())
                    || trimmed.as_bytes() == [severity.letter()]
                    || trimmed.as_bytes() == [severity.letter().to_ascii_lowercase()]
            })
            .ok_or_else(|| ParseSeverityError {
                input: input.to_owned(),
            })
    }
}
