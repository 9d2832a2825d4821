//! Statistics returned by the typed archive operations.

use std::path::PathBuf;
use std::time::Duration;

/// Report of an archive creation.
///
/// # Examples
///
/// ```
/// use aocomp_core::CreationReport;
///
/// let mut report = CreationReport::default();
/// report.bytes_read = 1000;
/// report.archive_size = 250;
/// assert_eq!(report.reduction_percentage(), 75.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CreationReport {
    /// Number of files added to the archive.
    pub files_added: u64,

    /// Total bytes read from source files.
    pub bytes_read: u64,

    /// Size of the finished archive on disk.
    pub archive_size: u64,

    /// Entries skipped (the archive itself when it lies inside the source).
    pub files_skipped: u64,

    /// Duration of the operation.
    pub duration: Duration,

    /// Warnings generated during creation.
    pub warnings: Vec<String>,
}

impl CreationReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Space saved relative to the source bytes, in percent.
    ///
    /// Returns 0.0 when nothing was read.
    #[must_use]
    pub fn reduction_percentage(&self) -> f64 {
        crate::format::reduction_percentage(self.bytes_read, self.archive_size)
    }
}

/// Report of an archive extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Directory the archive was extracted into.
    pub target: PathBuf,

    /// Number of files written.
    pub files_extracted: u64,

    /// Number of directory entries materialized.
    pub directories_created: u64,

    /// Entries skipped because they would escape the target or failed.
    pub entries_skipped: u64,

    /// Total bytes written to disk.
    pub bytes_written: u64,

    /// Duration of the operation.
    pub duration: Duration,

    /// Warnings generated during extraction, in order.
    pub warnings: Vec<String>,
}

impl ExtractionReport {
    /// Creates an empty report for `target`.
    #[must_use]
    pub fn new(target: PathBuf) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    /// Adds a warning message.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
