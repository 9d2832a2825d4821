//! Configuration for compression and extraction.

use crate::AoError;
use crate::Result;

/// Total size cap of [`ExtractionConfig::guarded`] (4 GiB).
pub const GUARDED_MAX_TOTAL_SIZE: u64 = 4 * 1024 * 1024 * 1024;

/// Per-entry ratio cap of [`ExtractionConfig::guarded`].
///
/// Deflate reaches about 1032:1 on runs of a single byte, so archives
/// written by this crate can exceed it.
pub const GUARDED_MAX_COMPRESSION_RATIO: f64 = 1000.0;

/// Configuration for archive creation.
///
/// # Examples
///
/// ```
/// use aocomp_core::CreationConfig;
///
/// let config = CreationConfig::default()
///     .with_compression_level(Some(9))
///     .with_preserve_permissions(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct CreationConfig {
    /// Deflate level (1-9). `None` uses the deflate default.
    ///
    /// Default: `None`.
    pub compression_level: Option<u8>,

    /// Store Unix permission bits with each entry.
    ///
    /// Default: `true`.
    pub preserve_permissions: bool,
}

impl Default for CreationConfig {
    fn default() -> Self {
        Self {
            compression_level: None,
            preserve_permissions: true,
        }
    }
}

impl CreationConfig {
    /// Creates a `CreationConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level.
    #[must_use]
    pub fn with_compression_level(mut self, level: Option<u8>) -> Self {
        self.compression_level = level;
        self
    }

    /// Sets whether to store permission bits.
    #[must_use]
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AoError::InvalidCompressionLevel`] when the level is outside
    /// 1-9.
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && !(1..=9).contains(&level)
        {
            return Err(AoError::InvalidCompressionLevel { level });
        }
        Ok(())
    }
}

/// Limits applied while extracting an archive.
///
/// The default sets no limit, so every archive [`create_archive`](crate::create_archive) writes
/// extracts again. Use [`ExtractionConfig::guarded`] or the `with_*`
/// setters for archives from untrusted sources. Both limits are checked against the sizes declared in the central
/// directory before anything is written, and the total is enforced again
/// against the bytes actually decompressed.
///
/// # Examples
///
/// ```
/// use aocomp_core::ExtractionConfig;
///
/// let config = ExtractionConfig::default().with_max_total_size(Some(1024 * 1024));
/// assert_eq!(config.max_total_size, Some(1024 * 1024));
///
/// let open = ExtractionConfig::default();
/// assert!(open.max_total_size.is_none());
/// assert!(open.max_compression_ratio.is_none());
///
/// let guarded = ExtractionConfig::guarded();
/// assert_eq!(guarded.max_compression_ratio, Some(1000.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExtractionConfig {
    /// Maximum total uncompressed size in bytes. `None` disables the check.
    pub max_total_size: Option<u64>,

    /// Maximum uncompressed/compressed ratio of one entry. `None` disables
    /// the check.
    pub max_compression_ratio: Option<f64>,
}

impl ExtractionConfig {
    /// Creates an `ExtractionConfig` without limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration for untrusted archives:
    /// - `max_total_size`: 4 GiB
    /// - `max_compression_ratio`: 1000
    #[must_use]
    pub fn guarded() -> Self {
        Self {
            max_total_size: Some(GUARDED_MAX_TOTAL_SIZE),
            max_compression_ratio: Some(GUARDED_MAX_COMPRESSION_RATIO),
        }
    }

    /// Sets the total size cap.
    #[must_use]
    pub fn with_max_total_size(mut self, max: Option<u64>) -> Self {
        self.max_total_size = max;
        self
    }

    /// Sets the per-entry ratio cap.
    #[must_use]
    pub fn with_max_compression_ratio(mut self, max: Option<f64>) -> Self {
        self.max_compression_ratio = max;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AoError::InvalidInput`] when the ratio cap is not a positive
    /// finite number.
    pub fn validate(&self) -> Result<()> {
        if let Some(ratio) = self.max_compression_ratio
            && !(ratio.is_finite() && ratio > 0.0)
        {
            return Err(AoError::invalid_input(format!(
                "invalid compression ratio limit: {ratio}"
            )));
        }
        Ok(())
    }
}
