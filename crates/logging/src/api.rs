//! crates/logging/src/api.rs
//! Free functions operating on the process-wide logger.

use std::fmt::{self, Display};
use std::sync::OnceLock;

use crate::dispatcher::Logger;
use crate::tag::Tag;

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Returns the process-wide logger.
///
/// Unless [`install`] ran first, the logger writes every record to standard
/// error with the default configuration.
pub fn logger() -> &'static Logger {
    LOGGER.get_or_init(Logger::stderr)
}

/// Installs `logger` as the process-wide logger.
///
/// Fails, handing the logger back, when the global logger was already
/// installed or first used.
pub fn install(logger: Logger) -> Result<(), Logger> {
    LOGGER.set(logger)
}

macro_rules! global_severity_fns {
    ($print:ident, $println:ident, $printf:ident, $depth:ident $(,)?) => {
        #[doc = concat!("See [`Logger::", stringify!($print), "`].")]
        #[track_caller]
        pub fn $print<'t>(tag: impl Into<Tag<'t>>, args: &[&dyn Display]) {
            logger().$print(tag, args);
        }

        #[doc = concat!("See [`Logger::", stringify!($println), "`].")]
        #[track_caller]
        pub fn $println<'t>(tag: impl Into<Tag<'t>>, args: &[&dyn Display]) {
            logger().$println(tag, args);
        }

        #[doc = concat!("See [`Logger::", stringify!($printf), "`].")]
        #[track_caller]
        pub fn $printf<'t>(tag: impl Into<Tag<'t>>, args: fmt::Arguments<'_>) {
            logger().$printf(tag, args);
        }

        #[doc = concat!("See [`Logger::", stringify!($depth), "`].")]
        #[track_caller]
        pub fn $depth<'t>(depth: usize, tag: impl Into<Tag<'t>>, args: &[&dyn Display]) {
            logger().$depth(depth, tag, args);
        }
    };
}

global_severity_fns!(info_tag, info_tag_ln, info_tagf, info_tag_depth);
global_severity_fns!(warning_tag, warning_tag_ln, warning_tagf, warning_tag_depth);
global_severity_fns!(error_tag, error_tag_ln, error_tagf, error_tag_depth);
