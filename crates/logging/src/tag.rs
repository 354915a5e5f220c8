//! crates/logging/src/tag.rs
//! Caller-supplied classification tag.

use std::fmt;

/// Free-form classification attached to a single record.
///
/// Any string is a valid tag, including the empty string. Tags are not
/// registered or stored; they only live for the duration of one call.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tag<'a>(&'a str);

impl<'a> Tag<'a> {
    /// Wraps `value` as a tag.
    #[must_use]
    pub const fn new(value: &'a str) -> Self {
        Self(value)
    }

    /// Returns the tag text.
    #[must_use]
    pub const fn as_str(&self) -> &'a str {
        self.0
    }
}

impl<'a> From<&'a str> for Tag<'a> {
    fn from(value: &'a str) -> Self {
        Self(value)
    }
}

impl<'a> From<&'a String> for Tag<'a> {
    fn from(value: &'a String) -> Self {
        Self(value.as_str())
    }
}

impl AsRef<str> for Tag<'_> {
    fn as_ref(&self) -> &str {
        self.0
    }
}

impl fmt::Display for Tag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
