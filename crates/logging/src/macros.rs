//! crates/logging/src/macros.rs
//! Call-site macros for the process-wide logger.
//!
//! The print-style macros take a tag followed by any number of `Display`
//! values; the `f` variants take a tag followed by `format_args!` input.
//!
//! ```
//! let peer = "10.0.0.7";
//! taglog::info_tag!("net", "connected to", peer);
//! taglog::warning_tagf!("net", "retry {} of {}", 2, 5);
//! ```

/// Logs at INFO through [`info_tag`](fn@crate::info_tag).
#[macro_export]
macro_rules! info_tag {
    ($tag:expr $(, $arg:expr)* $(,)?) => {
        $crate::info_tag($tag, &[$(&$arg as &dyn ::core::fmt::Display),*])
    };
}

/// Logs at INFO through [`info_tag_ln`](fn@crate::info_tag_ln).
#[macro_export]
macro_rules! info_tagln {
    ($tag:expr $(, $arg:expr)* $(,)?) => {
        $crate::info_tag_ln($tag, &[$(&$arg as &dyn ::core::fmt::Display),*])
    };
}

/// Logs at INFO through [`info_tagf`](fn@crate::info_tagf).
#[macro_export]
macro_rules! info_tagf {
    ($tag:expr, $($arg:tt)+) => {
        $crate::info_tagf($tag, ::core::format_args!($($arg)+))
    };
}

/// Logs at WARNING through [`warning_tag`](fn@crate::warning_tag).
#[macro_export]
macro_rules! warning_tag {
    ($tag:expr $(, $arg:expr)* $(,)?) => {
        $crate::warning_tag($tag, &[$(&$arg as &dyn ::core::fmt::Display),*])
    };
}

/// Logs at WARNING through [`warning_tag_ln`](fn@crate::warning_tag_ln).
#[macro_export]
macro_rules! warning_tagln {
    ($tag:expr $(, $arg:expr)* $(,)?) => {
        $crate::warning_tag_ln($tag, &[$(&$arg as &dyn ::core::fmt::Display),*])
    };
}

/// Logs at WARNING through [`warning_tagf`](fn@crate::warning_tagf).
#[macro_export]
macro_rules! warning_tagf {
    ($tag:expr, $($arg:tt)+) => {
        $crate::warning_tagf($tag, ::core::format_args!($($arg)+))
    };
}

/// Logs at ERROR through [`error_tag`](fn@crate::error_tag).
#[macro_export]
macro_rules! error_tag {
    ($tag:expr $(, $arg:expr)* $(,)?) => {
        $crate::error_tag($tag, &[$(&$arg as &dyn ::core::fmt::Display),*])
    };
}

/// Logs at ERROR through [`error_tag_ln`](fn@crate::error_tag_ln).
#[macro_export]
macro_rules! error_tagln {
    ($tag:expr $(, $arg:expr)* $(,)?) => {
        $crate::error_tag_ln($tag, &[$(&$arg as &dyn ::core::fmt::Display),*])
    };
}

/// Logs at ERROR through [`error_tagf`](fn@crate::error_tagf).
#[macro_export]
macro_rules! error_tagf {
    ($tag:expr, $($arg:tt)+) => {
        $crate::error_tagf($tag, ::core::format_args!($($arg)+))
    };
}
