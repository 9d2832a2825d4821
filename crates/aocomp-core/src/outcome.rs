//! Uniform result of a compress or decompress operation.

use crate::sink::LogRecord;
use crate::sink::Severity;

/// Summary value returned by [`compress`](crate::compress) and
/// [`decompress`](crate::decompress).
///
/// A failure carries no file count.
///
/// # Examples
///
/// ```
/// use aocomp_core::Outcome;
/// use aocomp_core::Severity;
///
/// let done = Outcome::success(2, "Compression successful!");
/// assert_eq!(done.count(), Some(2));
/// assert_eq!(done.severity(), Severity::Success);
///
/// let idle = Outcome::success(0, "No files to compress.");
/// assert_eq!(idle.severity(), Severity::Warning);
///
/// let failed = Outcome::failure("Invalid file path.");
/// assert_eq!(failed.count(), None);
/// assert_eq!(failed.legacy_count(), -1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The operation completed.
    Success {
        /// Number of files processed. Zero means there was nothing to do.
        count: u64,
        /// Message for the user.
        message: String,
    },
    /// The operation failed as a whole.
    Failure {
        /// Message for the user.
        message: String,
    },
}

impl Outcome {
    /// Creates a success outcome.
    pub fn success(count: u64, message: impl Into<String>) -> Self {
        Self::Success {
            count,
            message: message.into(),
        }
    }

    /// Creates a failure outcome.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    /// Returns `true` for [`Outcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Number of processed files, or `None` for a failure.
    #[must_use]
    pub const fn count(&self) -> Option<u64> {
        match self {
            Self::Success { count, .. } => Some(*count),
            Self::Failure { .. } => None,
        }
    }

    /// Processed count with `-1` standing for a failure.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn legacy_count(&self) -> i64 {
        match self {
            Self::Success { count, .. } => *count as i64,
            Self::Failure { .. } => -1,
        }
    }

    /// Returns `true` for a success that processed at least one file.
    #[must_use]
    pub const fn did_work(&self) -> bool {
        matches!(self, Self::Success { count, .. } if *count > 0)
    }

    /// The user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. } | Self::Failure { message } => message,
        }
    }

    /// Severity the driver should display the message with.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::Success { count: 0, .. } => Severity::Warning,
            Self::Success { .. } => Severity::Success,
            Self::Failure { .. } => Severity::Error,
        }
    }

    /// The final log record for this outcome.
    #[must_use]
    pub fn to_record(&self) -> LogRecord {
        LogRecord::new(self.message(), self.severity())
    }
}
