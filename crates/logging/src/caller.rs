//! crates/logging/src/caller.rs
//! Resolution of the source location a log record is attributed to.
//!
//! # Depth contract
//!
//! Every layer between a public entry point and this module is
//! `#[track_caller]`, so [`Location::caller`] inside the dispatcher is the
//! call site of the public API. That location is the *anchor* and is depth
//! `0`; it is resolved without walking the stack.
//!
//! For `depth > 0` the stack is walked with the `backtrace` crate. The walk
//! starts from the innermost frame, skips every frame up to and including the
//! one whose file and line match the anchor, and then counts `depth` further
//! frames outwards. Inlined functions count as frames of their own, so the
//! result does not depend on optimisation decisions. The fixed base offset is
//! therefore "the frame that called the public entry point", independent of
//! how many internal layers the dispatcher has.
//!
//! A helper wrapping a `*_depth` entry point either passes `depth = 1` and
//! stays a plain function, or is `#[track_caller]` itself and passes
//! `depth = 0`. Doing both skips one frame too many.
//!
//! When the anchor cannot be found (no debug info, stripped binaries) or the
//! stack is shallower than requested, the frame degrades to
//! [`CallerFrame::unresolved`].

use std::borrow::Cow;
use std::panic::Location;
use std::path::Path;

/// File name used when no source location is available.
pub const UNKNOWN_FILE: &str = "???";

/// Line number used when no source location is available.
pub const UNKNOWN_LINE: u32 = 1;

/// Source position a record is attributed to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CallerFrame<'a> {
    file: Cow<'a, str>,
    line: u32,
    resolved: bool,
}

impl<'a> CallerFrame<'a> {
    /// Sentinel frame used when resolution fails.
    #[must_use]
    pub const fn unresolved() -> Self {
        Self {
            file: Cow::Borrowed(UNKNOWN_FILE),
            line: UNKNOWN_LINE,
            resolved: false,
        }
    }

    /// Builds a frame from a compiler-provided location.
    #[must_use]
    pub fn from_location(location: &'a Location<'a>, add_dir: bool) -> Self {
        Self::from_parts(Some(location.file()), Some(location.line()), add_dir)
    }

    /// Builds a frame from optional pieces, degrading to
    /// [`unresolved`](Self::unresolved) when the file is missing or empty.
    #[must_use]
    pub fn from_parts(file: Option<&'a str>, line: Option<u32>, add_dir: bool) -> Self {
        match file {
            Some(path) if !path.is_empty() => Self {
                file: Cow::Borrowed(trim_file(path, add_dir)),
                line: line.unwrap_or(UNKNOWN_LINE),
                resolved: true,
            },
            _ => Self::unresolved(),
        }
    }

    /// Returns the trimmed file name.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Returns the line number.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Reports whether the frame came from a real location.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved
    }
}

impl CallerFrame<'static> {
    fn owned(path: &str, line: u32, add_dir: bool) -> Self {
        if path.is_empty() {
            return Self::unresolved();
        }
        Self {
            file: Cow::Owned(trim_file(path, add_dir).to_owned()),
            line,
            resolved: true,
        }
    }
}

/// Resolves the application call site of the current log call.
///
/// Wrapping helpers compose through `#[track_caller]`; see the
/// [module documentation](self) for the depth contract.
#[track_caller]
#[must_use]
pub fn resolve(add_dir: bool) -> CallerFrame<'static> {
    CallerFrame::from_location(Location::caller(), add_dir)
}

/// Resolves the frame `depth` levels above `anchor`.
///
/// `depth == 0` returns `anchor` itself. Larger depths walk the stack as
/// described in the [module documentation](self).
#[must_use]
pub fn resolve_depth(
    anchor: &'static Location<'static>,
    depth: usize,
    add_dir: bool,
) -> CallerFrame<'static> {
    if depth == 0 {
        return CallerFrame::from_location(anchor, add_dir);
    }

    let mut above_anchor: Option<usize> = None;
    let mut target: Option<Option<(String, u32)>> = None;

    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if target.is_some() {
                return;
            }
            let location = symbol.filename().zip(symbol.lineno());
            match above_anchor {
                None => {
                    if location.is_some_and(|(path, line)| is_anchor(path, line, anchor)) {
                        above_anchor = Some(0);
                    }
                }
                Some(seen) => {
                    let seen = seen + 1;
                    above_anchor = Some(seen);
                    if seen == depth {
                        target = Some(
                            location.map(|(path, line)| (path.to_string_lossy().into_owned(), line)),
                        );
                    }
                }
            }
        });
        target.is_none()
    });

    match target.flatten() {
        Some((path, line)) => CallerFrame::owned(&path, line, add_dir),
        None => CallerFrame::unresolved(),
    }
}

fn is_anchor(path: &Path, line: u32, anchor: &Location<'_>) -> bool {
    line == anchor.line() && path.ends_with(anchor.file())
}

/// Trims `path` to its base name, or to the parent directory plus base name
/// when `add_dir` is set.
///
/// Both `/` and `\` count as separators. Paths without a separator are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use taglog::trim_file;
///
/// assert_eq!(trim_file("src/net/conn.rs", false), "conn.rs");
/// assert_eq!(trim_file("src/net/conn.rs", true), "net/conn.rs");
/// assert_eq!(trim_file("conn.rs", true), "conn.rs");
/// ```
#[must_use]
pub fn trim_file(path: &str, add_dir: bool) -> &str {
    let is_separator = |c: char| c == '/' || c == '\\';
    let Some(slash) = path.rfind(is_separator) else {
        return path;
    };
    if add_dir {
        let parent = &path[..slash];
        return match parent.rfind(is_separator) {
            Some(dir) => &path[dir + 1..],
            None if !parent.is_empty() => path,
            None => &path[slash + 1..],
        };
    }
    &path[slash + 1..]
}
