//! Size and expansion-ratio caps for hostile archives.

use crate::AoError;
use crate::ExtractionConfig;
use crate::Result;
use crate::error::LimitExceeded;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

/// Sizes an archive declares for one entry in its central directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredSize {
    /// Entry name as stored.
    pub name: String,
    /// Compressed size in bytes.
    pub compressed: u64,
    /// Uncompressed size in bytes.
    pub uncompressed: u64,
}

/// Checks declared sizes against the configured limits before any byte is
/// written.
///
/// Entries with a compressed size of zero are not ratio-checked.
///
/// # Errors
///
/// Returns [`AoError::ArchiveTooLarge`] for the first limit exceeded.
pub fn check_declared_sizes<'a, I>(entries: I, config: &ExtractionConfig) -> Result<()>
where
    I: IntoIterator<Item = &'a DeclaredSize>,
{
    let mut total = 0u64;
    for entry in entries {
        if let Some(max) = config.max_compression_ratio
            && entry.compressed > 0
        {
            let ratio = entry.uncompressed as f64 / entry.compressed as f64;
            if ratio > max {
                return Err(AoError::ArchiveTooLarge {
                    limit: LimitExceeded::CompressionRatio {
                        entry: entry.name.clone(),
                        compressed: entry.compressed,
                        uncompressed: entry.uncompressed,
                        max,
                    },
                });
            }
        }

        total = total.saturating_add(entry.uncompressed);
        if let Some(max) = config.max_total_size
            && total > max
        {
            return Err(AoError::ArchiveTooLarge {
                limit: LimitExceeded::TotalSize { size: total, max },
            });
        }
    }
    Ok(())
}

/// Tracks bytes actually decompressed against the total size cap.
///
/// Declared sizes can lie; the budget stops a copy as soon as the real
/// output passes the cap.
#[derive(Debug)]
pub struct SizeBudget {
    max: Option<u64>,
    used: u64,
    buffer: Vec<u8>,
}

impl SizeBudget {
    /// Creates a budget. `None` means unlimited.
    #[must_use]
    pub fn new(max: Option<u64>) -> Self {
        Self {
            max,
            used: 0,
            buffer: vec![0u8; 64 * 1024],
        }
    }

    /// Bytes copied so far across all entries.
    #[must_use]
    pub fn used(&self) -> u64 {
        self.used
    }

    /// Copies `reader` into `writer`, charging every byte to the budget.
    ///
    /// `entry` names the source in read errors and `dest` the target in write
    /// errors. Returns the number of bytes copied for this entry.
    ///
    /// # Errors
    ///
    /// - [`AoError::IoRead`] when the entry stream fails
    /// - [`AoError::IoWrite`] when the destination fails
    /// - [`AoError::ArchiveTooLarge`] when the budget is exhausted
    pub fn copy<R: Read, W: Write>(
        &mut self,
        reader: &mut R,
        writer: &mut W,
        entry: &str,
        dest: &Path,
    ) -> Result<u64> {
        let mut copied = 0u64;
        loop {
            let n = reader
                .read(&mut self.buffer)
                .map_err(|source| AoError::IoRead {
                    path: PathBuf::from(entry),
                    source,
                })?;
            if n == 0 {
                break;
            }

            self.used = self.used.saturating_add(n as u64);
            if let Some(max) = self.max
                && self.used > max
            {
                return Err(AoError::ArchiveTooLarge {
                    limit: LimitExceeded::TotalSize {
                        size: self.used,
                        max,
                    },
                });
            }

            writer
                .write_all(&self.buffer[..n])
                .map_err(|source| AoError::IoWrite {
                    path: dest.to_path_buf(),
                    source,
                })?;
            copied += n as u64;
        }
        Ok(copied)
    }
}
