//! Archive-to-directory extraction with traversal protection.

use crate::AoError;
use crate::ExtractionConfig;
use crate::ExtractionReport;
use crate::LogSink;
use crate::Result;
use crate::security::DeclaredSize;
use crate::security::SizeBudget;
use crate::security::check_declared_sizes;
use crate::security::within_root;
use std::fs;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;
use zip::ZipArchive;

/// Suffix appended to the archive stem to name the extraction directory.
pub const TARGET_SUFFIX: &str = "-decompressed";

/// Everything before the last `.` of a file name.
///
/// A name without a dot, or whose only dot is the leading one, is returned
/// whole.
///
/// ```
/// use aocomp_core::extract::archive_stem;
///
/// assert_eq!(archive_stem("resources.ao"), "resources");
/// assert_eq!(archive_stem("data.tar.ao"), "data.tar");
/// assert_eq!(archive_stem("noext"), "noext");
/// assert_eq!(archive_stem(".hidden"), ".hidden");
/// ```
#[must_use]
pub fn archive_stem(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(0) | None => file_name,
        Some(idx) => &file_name[..idx],
    }
}

/// Directory an archive is extracted into: `target_root/<stem>-decompressed`.
#[must_use]
pub fn extraction_target(archive: &Path, target_root: &Path) -> PathBuf {
    let file_name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target_root.join(format!("{}{TARGET_SUFFIX}", archive_stem(&file_name)))
}

/// Extracts `archive` into `target_root/<stem>-decompressed`.
///
/// Entries are processed in archive order. An entry that would resolve
/// outside the extraction directory is skipped with a warning; so is an
/// entry whose directory or file cannot be written. Limits from `config`
/// are checked against the declared sizes before anything is written, and
/// the total is enforced again on the bytes actually decompressed.
///
/// On a fatal error the extraction directory is removed, unless it existed
/// before this call.
///
/// # Examples
///
/// ```no_run
/// use aocomp_core::CollectingSink;
/// use aocomp_core::ExtractionConfig;
/// use aocomp_core::extract_archive;
///
/// let mut sink = CollectingSink::new();
/// let report = extract_archive("resources.ao", ".", &ExtractionConfig::default(), &mut sink)?;
/// println!("{} files into {}", report.files_extracted, report.target.display());
/// # Ok::<(), aocomp_core::AoError>(())
/// ```
///
/// # Errors
///
/// - [`AoError::InvalidInput`] if `archive` is not an existing file
/// - [`AoError::BadArchive`] if it is not a readable ZIP
/// - [`AoError::ArchiveTooLarge`] if a limit is exceeded
/// - [`AoError::IoWrite`] if the extraction directory cannot be created
pub fn extract_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    archive: P,
    target_root: Q,
    config: &ExtractionConfig,
    sink: &mut dyn LogSink,
) -> Result<ExtractionReport> {
    let archive = archive.as_ref();
    config.validate()?;
    if !archive.is_file() {
        return Err(AoError::invalid_input("Invalid file path."));
    }

    let target = extraction_target(archive, target_root.as_ref());
    let existed = target.exists();
    fs::create_dir_all(&target).map_err(|source| AoError::IoWrite {
        path: target.clone(),
        source,
    })?;

    let start = Instant::now();
    let mut report = ExtractionReport::new(target.clone());
    match extract_into(archive, &target, config, sink, &mut report) {
        Ok(()) => {
            report.duration = start.elapsed();
            Ok(report)
        }
        Err(e) => {
            if !existed {
                log::debug!("removing partial tree {}: {e}", target.display());
                let _ = fs::remove_dir_all(&target);
            }
            Err(e)
        }
    }
}

fn extract_into(
    archive: &Path,
    target: &Path,
    config: &ExtractionConfig,
    sink: &mut dyn LogSink,
    report: &mut ExtractionReport,
) -> Result<()> {
    let file = File::open(archive).map_err(|source| AoError::IoRead {
        path: archive.to_path_buf(),
        source,
    })?;
    let mut zip = ZipArchive::new(file).map_err(|e| AoError::BadArchive(e.to_string()))?;

    let declared = declared_sizes(&mut zip)?;
    check_declared_sizes(&declared, config)?;

    let mut budget = SizeBudget::new(config.max_total_size);
    for (index, entry) in declared.iter().enumerate() {
        let name = entry.name.as_str();
        let dest = target.join(name);

        if !within_root(target, &dest).unwrap_or(false) {
            log::warn!("entry '{name}' resolves outside {}", target.display());
            skip(sink, report, format!("Skipping file ({name}) outside folder."));
            continue;
        }

        let mut file = match zip.by_index(index) {
            Ok(file) => file,
            Err(e) => {
                skip(sink, report, format!("Could not extract '{name}': {e}"));
                continue;
            }
        };

        if file.is_dir() {
            match fs::create_dir_all(&dest) {
                Ok(()) => report.directories_created += 1,
                Err(e) => {
                    log::debug!("create_dir_all({}) failed: {e}", dest.display());
                    skip(sink, report, format!("Could not create directory '{name}'."));
                }
            }
            continue;
        }

        match write_entry(&mut file, name, &dest, &mut budget) {
            Ok(bytes) => {
                report.files_extracted += 1;
                report.bytes_written += bytes;
            }
            Err(e) if e.is_recoverable() => {
                let _ = fs::remove_file(&dest);
                skip(sink, report, format!("Could not extract '{name}': {e}"));
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

fn declared_sizes(zip: &mut ZipArchive<File>) -> Result<Vec<DeclaredSize>> {
    (0..zip.len())
        .map(|i| {
            let entry = zip
                .by_index_raw(i)
                .map_err(|e| AoError::BadArchive(e.to_string()))?;
            Ok(DeclaredSize {
                name: entry.name().to_string(),
                compressed: entry.compressed_size(),
                uncompressed: entry.size(),
            })
        })
        .collect()
}

fn write_entry<R: std::io::Read>(
    reader: &mut R,
    name: &str,
    dest: &Path,
    budget: &mut SizeBudget,
) -> Result<u64> {
    let write_err = |source| AoError::IoWrite {
        path: dest.to_path_buf(),
        source,
    };
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let mut out = File::create(dest).map_err(write_err)?;
    budget.copy(reader, &mut out, name, dest)
}

fn skip(sink: &mut dyn LogSink, report: &mut ExtractionReport, message: String) {
    sink.warn(&message);
    report.entries_skipped += 1;
    report.add_warning(message);
}
