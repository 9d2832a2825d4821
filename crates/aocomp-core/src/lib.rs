//! Archive engine for `.ao` resource packs.
//!
//! `aocomp-core` packs a directory tree into a ZIP container (conventionally
//! named `*.ao`), extracts such archives with protection against path
//! traversal and decompression bombs, and inspects them entry by entry
//! (sizes, SHA-256 digests, content type from magic bytes).
//!
//! Operations report progress through a [`LogSink`] and finish with an
//! [`Outcome`]; the typed variants return reports and [`AoError`].
//!
//! # Examples
//!
//! ```no_run
//! use aocomp_core::CollectingSink;
//! use aocomp_core::compress;
//! use aocomp_core::decompress;
//!
//! let outcome = compress("resources", "resources.ao");
//! assert!(outcome.is_success());
//!
//! let mut sink = CollectingSink::new();
//! let outcome = decompress("resources.ao", "/tmp", &mut sink);
//! println!("{} ({:?} files)", outcome.message(), outcome.count());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod compress;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod inspect;
pub mod outcome;
pub mod report;
pub mod security;
pub mod signature;
pub mod sink;
pub mod walker;

pub use api::compress;
pub use api::compress_with_config;
pub use api::creation_outcome;
pub use api::decompress;
pub use api::decompress_with_config;
pub use api::extraction_outcome;
pub use compress::create_archive;
pub use config::CreationConfig;
pub use config::ExtractionConfig;
pub use error::AoError;
pub use error::LimitExceeded;
pub use error::Result;
pub use extract::extract_archive;
pub use inspect::ArchiveInspection;
pub use inspect::ContentDetails;
pub use inspect::EntryInspection;
pub use inspect::inspect;
pub use inspect::inspect_archive;
pub use outcome::Outcome;
pub use report::CreationReport;
pub use report::ExtractionReport;
pub use signature::FileType;
pub use sink::CollectingSink;
pub use sink::LogRecord;
pub use sink::LogSink;
pub use sink::NoopSink;
pub use sink::Severity;
