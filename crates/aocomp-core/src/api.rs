//! High-level operations returning an [`Outcome`].
//!
//! These wrap the typed functions ([`create_archive`], [`extract_archive`])
//! and fold their result into the uniform outcome a driver displays.

use crate::CreationConfig;
use crate::CreationReport;
use crate::ExtractionConfig;
use crate::ExtractionReport;
use crate::LogSink;
use crate::Outcome;
use crate::Result;
use crate::compress::create_archive;
use crate::extract::extract_archive;
use std::path::Path;

/// Message of a compression that wrote an archive.
pub const COMPRESS_OK: &str = "Compression successful!";
/// Message of a compression whose source held no regular file.
pub const COMPRESS_NOTHING: &str = "No files to compress.";
/// Message of a completed extraction.
pub const DECOMPRESS_OK: &str = "Decompression successful!";

/// Compresses `source_dir` into `target_archive` with default settings.
///
/// # Examples
///
/// ```no_run
/// use aocomp_core::compress;
///
/// let outcome = compress("resources", "resources.ao");
/// println!("{}", outcome.message());
/// ```
pub fn compress<P: AsRef<Path>, Q: AsRef<Path>>(source_dir: P, target_archive: Q) -> Outcome {
    compress_with_config(source_dir, target_archive, &CreationConfig::default())
}

/// Compresses `source_dir` into `target_archive` with `config`.
///
/// Success with count 0 means the source held no regular file and no
/// archive was written. On failure no archive is left behind.
pub fn compress_with_config<P: AsRef<Path>, Q: AsRef<Path>>(
    source_dir: P,
    target_archive: Q,
    config: &CreationConfig,
) -> Outcome {
    creation_outcome(&create_archive(source_dir, target_archive, config))
}

/// Folds the result of [`create_archive`] into an [`Outcome`].
#[must_use]
pub fn creation_outcome(result: &Result<CreationReport>) -> Outcome {
    match result {
        Ok(report) if report.files_added == 0 => Outcome::success(0, COMPRESS_NOTHING),
        Ok(report) => Outcome::success(report.files_added, COMPRESS_OK),
        Err(e) => Outcome::failure(e.to_string()),
    }
}

/// Extracts `source_archive` under `target_root` with default limits.
///
/// Skipped entries are reported to `sink` as warnings.
///
/// # Examples
///
/// ```no_run
/// use aocomp_core::CollectingSink;
/// use aocomp_core::decompress;
///
/// let mut sink = CollectingSink::new();
/// let outcome = decompress("resources.ao", ".", &mut sink);
/// for record in sink.records() {
///     println!("{}", record.text);
/// }
/// println!("{} ({:?} files)", outcome.message(), outcome.count());
/// ```
pub fn decompress<P: AsRef<Path>, Q: AsRef<Path>>(
    source_archive: P,
    target_root: Q,
    sink: &mut dyn LogSink,
) -> Outcome {
    decompress_with_config(
        source_archive,
        target_root,
        &ExtractionConfig::default(),
        sink,
    )
}

/// Extracts `source_archive` under `target_root` with `config`.
pub fn decompress_with_config<P: AsRef<Path>, Q: AsRef<Path>>(
    source_archive: P,
    target_root: Q,
    config: &ExtractionConfig,
    sink: &mut dyn LogSink,
) -> Outcome {
    extraction_outcome(&extract_archive(source_archive, target_root, config, sink))
}

/// Folds the result of [`extract_archive`] into an [`Outcome`].
#[must_use]
pub fn extraction_outcome(result: &Result<ExtractionReport>) -> Outcome {
    match result {
        Ok(report) => Outcome::success(report.files_extracted, DECOMPRESS_OK),
        Err(e) => Outcome::failure(e.to_string()),
    }
}
