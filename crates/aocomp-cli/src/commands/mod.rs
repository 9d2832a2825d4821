//! Subcommand implementations.
//!
//! Each `execute` streams its log to the formatter and returns whether the
//! operation succeeded.

pub mod completion;
pub mod compress;
pub mod decompress;
pub mod inspect;
