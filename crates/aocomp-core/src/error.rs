//! Error types for archive operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `AoError`.
pub type Result<T> = std::result::Result<T, AoError>;

/// Describes which archive limit was exceeded.
#[derive(Debug, Clone, PartialEq)]
pub enum LimitExceeded {
    /// Declared or actual total uncompressed size is over the cap.
    TotalSize {
        /// Size reached in bytes.
        size: u64,
        /// Maximum allowed total size in bytes.
        max: u64,
    },
    /// A single entry expands more than the allowed ratio.
    CompressionRatio {
        /// Entry name as stored in the archive.
        entry: String,
        /// Compressed size in bytes.
        compressed: u64,
        /// Uncompressed size in bytes.
        uncompressed: u64,
        /// Maximum allowed ratio (uncompressed / compressed).
        max: f64,
    },
}

impl std::fmt::Display for LimitExceeded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TotalSize { size, max } => {
                write!(f, "total uncompressed size ({size} > {max})")
            }
            Self::CompressionRatio {
                entry,
                compressed,
                uncompressed,
                max,
            } => {
                write!(
                    f,
                    "compression ratio of '{entry}' ({uncompressed}/{compressed} > {max:.0})"
                )
            }
        }
    }
}

/// Errors that can occur while compressing, extracting or inspecting.
#[derive(Error, Debug)]
pub enum AoError {
    /// A source or target path failed the pre-flight checks.
    #[error("{reason}")]
    InvalidInput {
        /// Human-readable reason.
        reason: String,
    },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading a file failed.
    #[error("cannot read '{path}': {source}")]
    IoRead {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Writing a file failed.
    #[error("cannot write '{path}': {source}")]
    IoWrite {
        /// File being written.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Archive cannot be opened or is structurally malformed.
    #[error("invalid archive: {0}")]
    BadArchive(String),

    /// Archive exceeds a configured extraction limit.
    #[error("archive too large: {limit}")]
    ArchiveTooLarge {
        /// The limit that was exceeded.
        limit: LimitExceeded,
    },

    /// Configured compression level is outside 1-9.
    #[error("invalid compression level {level} (expected 1-9)")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },
}

impl AoError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Returns `true` if this error stems from hostile archive content.
    ///
    /// # Examples
    ///
    /// ```
    /// use aocomp_core::AoError;
    /// use aocomp_core::LimitExceeded;
    ///
    /// let err = AoError::ArchiveTooLarge {
    ///     limit: LimitExceeded::TotalSize { size: 2048, max: 1024 },
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = AoError::BadArchive("truncated".to_string());
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(self, Self::ArchiveTooLarge { .. })
    }

    /// Returns `true` if extraction can skip the offending entry and go on.
    ///
    /// Read and write failures tied to one file only affect that entry;
    /// everything else aborts the current operation.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::IoWrite { .. } | Self::IoRead { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_display_is_reason() {
        let err = AoError::invalid_input("Invalid source directory.");
        assert_eq!(err.to_string(), "Invalid source directory.");
    }

    #[test]
    fn test_io_read_is_recoverable() {
        let err = AoError::IoRead {
            path: PathBuf::from("in/file.bin"),
            source: std::io::Error::other("short read"),
        };
        assert!(err.to_string().contains("cannot read 'in/file.bin'"));
        assert!(err.is_recoverable());
        assert!(!err.is_security_violation());
    }

    #[test]
    fn test_only_limits_are_security_violations() {
        assert!(!AoError::invalid_input("Invalid file path.").is_security_violation());
        assert!(!AoError::BadArchive("truncated".to_string()).is_security_violation());
        assert!(!AoError::InvalidCompressionLevel { level: 0 }.is_security_violation());
    }

    #[test]
    fn test_archive_too_large_total_size() {
        let err = AoError::ArchiveTooLarge {
            limit: LimitExceeded::TotalSize {
                size: 2048,
                max: 1024,
            },
        };
        let display = err.to_string();
        assert!(display.contains("archive too large"));
        assert!(display.contains("2048 > 1024"));
        assert!(err.is_security_violation());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_archive_too_large_ratio() {
        let limit = LimitExceeded::CompressionRatio {
            entry: "bomb.bin".to_string(),
            compressed: 10,
            uncompressed: 100_000,
            max: 1000.0,
        };
        let display = limit.to_string();
        assert!(display.contains("bomb.bin"));
        assert!(display.contains("100000/10 > 1000"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AoError = io_err.into();
        assert!(matches!(err, AoError::Io(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_io_read_write_carry_path() {
        let err = AoError::IoWrite {
            path: PathBuf::from("out/file.bin"),
            source: std::io::Error::other("disk full"),
        };
        let display = err.to_string();
        assert!(display.contains("out/file.bin"));
        assert!(display.contains("disk full"));
        assert!(err.is_recoverable());
        assert!(!err.is_security_violation());
    }

    #[test]
    fn test_invalid_compression_level() {
        let err = AoError::InvalidCompressionLevel { level: 12 };
        assert!(err.to_string().contains("12"));
    }
}
