//! Actionable advice for typed core errors.
//!
//! The outcome message is the error's own text; hints only add what the
//! user can do about it through this CLI.

use aocomp_core::AoError;
use aocomp_core::LimitExceeded;

/// Returns a `HINT:` line for errors a flag or a second look can fix.
pub fn hint(err: &AoError) -> Option<String> {
    let text = match err {
        AoError::ArchiveTooLarge {
            limit: LimitExceeded::TotalSize { .. },
        } => "HINT: Raise --max-total-size, or drop it and --guarded for trusted archives.",
        AoError::ArchiveTooLarge {
            limit: LimitExceeded::CompressionRatio { .. },
        } => {
            "HINT: Use --max-compression-ratio to allow higher ratios if the archive is legitimate."
        }
        AoError::BadArchive(_) => "HINT: The file may be corrupted or is not a .ao/ZIP archive.",
        AoError::InvalidCompressionLevel { .. } => "HINT: Pass a level between 1 and 9.",
        AoError::IoWrite { .. } => "HINT: Check free space and write permissions of the destination.",
        _ => return None,
    };
    Some(text.to_string())
}
