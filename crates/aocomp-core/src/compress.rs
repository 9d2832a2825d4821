//! Directory-to-archive compression.
//!
//! The archive is either complete or absent: any error after the output file
//! is opened removes it before the error is returned.

use crate::AoError;
use crate::CreationConfig;
use crate::CreationReport;
use crate::Result;
use crate::walker::SourceWalker;
use crate::walker::entry_name;
use std::fs;
use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Files of this size or more need ZIP64 headers.
const ZIP64_THRESHOLD: u64 = 0xFFFF_FFFF;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Compresses every regular file under `source_dir` into a ZIP archive at
/// `target`.
///
/// Entry names are paths relative to `source_dir` with `/` separators, in
/// walk order. When the source holds no regular file the archive is not
/// created and the report has `files_added == 0`. If `target` lies inside
/// `source_dir` it is left out of the archive and counted in
/// `files_skipped`, with a warning.
///
/// # Examples
///
/// ```no_run
/// use aocomp_core::CreationConfig;
/// use aocomp_core::create_archive;
///
/// let report = create_archive("resources", "resources.ao", &CreationConfig::default())?;
/// println!("{} files, {} bytes", report.files_added, report.archive_size);
/// # Ok::<(), aocomp_core::AoError>(())
/// ```
///
/// # Errors
///
/// - [`AoError::InvalidInput`] if `source_dir` is not a directory
/// - [`AoError::InvalidCompressionLevel`] for a bad configuration
/// - any I/O or ZIP error while writing, after the partial archive is removed
pub fn create_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    source_dir: P,
    target: Q,
    config: &CreationConfig,
) -> Result<CreationReport> {
    let source_dir = source_dir.as_ref();
    let target = target.as_ref();

    config.validate()?;
    if !source_dir.is_dir() {
        return Err(AoError::invalid_input("Invalid source directory."));
    }

    let root = fs::canonicalize(source_dir)?;
    let own = canonical_target(target).filter(|own| own.starts_with(&root));
    let mut walker = SourceWalker::new(&root);
    if let Some(own) = &own {
        walker = walker.exclude(own);
    }

    if !walker.has_files()? {
        log::debug!("no regular files under {}", root.display());
        return Ok(CreationReport::new());
    }

    let mut report = create_from_files(target, &root, walker.files(), config)?;
    if let Some(own) = own {
        let name = entry_name(&root, &own)?;
        log::debug!("left {name} out of its own archive");
        report.files_skipped += 1;
        report.add_warning(format!("Skipping archive ({name}) inside source folder."));
    }
    Ok(report)
}

/// Writes `files` (all under `root`) into a new archive at `target`,
/// removing it again if anything fails.
pub(crate) fn create_from_files<I>(
    target: &Path,
    root: &Path,
    files: I,
    config: &CreationConfig,
) -> Result<CreationReport>
where
    I: IntoIterator<Item = Result<PathBuf>>,
{
    let start = Instant::now();
    let file = File::create(target).map_err(|source| AoError::IoWrite {
        path: target.to_path_buf(),
        source,
    })?;

    let mut report = CreationReport::new();
    let written = write_entries(file, root, files, config, &mut report);

    if let Err(e) = written {
        log::debug!("removing partial archive {}: {e}", target.display());
        let _ = fs::remove_file(target);
        return Err(e);
    }

    report.archive_size = fs::metadata(target)
        .map_err(|source| AoError::IoRead {
            path: target.to_path_buf(),
            source,
        })?
        .len();
    report.duration = start.elapsed();
    Ok(report)
}

fn write_entries<W, I>(
    writer: W,
    root: &Path,
    files: I,
    config: &CreationConfig,
    report: &mut CreationReport,
) -> Result<()>
where
    W: Write + Seek,
    I: IntoIterator<Item = Result<PathBuf>>,
{
    let mut zip = ZipWriter::new(writer);
    let options = base_options(config);
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];

    for path in files {
        let path = path?;
        let name = entry_name(root, &path)?;
        add_file(&mut zip, &path, &name, options, config, report, &mut buffer)?;
    }

    zip.finish()
        .map_err(|e| std::io::Error::other(format!("failed to finish ZIP archive: {e}")))?;
    Ok(())
}

fn base_options(config: &CreationConfig) -> SimpleFileOptions {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    match config.compression_level {
        Some(level) => options.compression_level(Some(i64::from(level))),
        None => options,
    }
}

fn add_file<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    path: &Path,
    name: &str,
    options: SimpleFileOptions,
    config: &CreationConfig,
    report: &mut CreationReport,
    buffer: &mut [u8],
) -> Result<()> {
    let read_err = |source| AoError::IoRead {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(read_err)?;
    let metadata = file.metadata().map_err(read_err)?;

    let mut options = options.large_file(metadata.len() >= ZIP64_THRESHOLD);
    if config.preserve_permissions {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            options = options.unix_permissions(metadata.permissions().mode());
        }
    }

    zip.start_file(name, options)
        .map_err(|e| std::io::Error::other(format!("failed to start entry '{name}': {e}")))?;

    let mut bytes = 0u64;
    loop {
        let n = file.read(buffer).map_err(read_err)?;
        if n == 0 {
            break;
        }
        zip.write_all(&buffer[..n])?;
        bytes += n as u64;
    }

    log::debug!("added {name} ({bytes} bytes)");
    report.files_added += 1;
    report.bytes_read += bytes;
    Ok(())
}

/// Canonical form of the archive path, for excluding it from the walk.
fn canonical_target(target: &Path) -> Option<PathBuf> {
    let file_name = target.file_name()?;
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::canonicalize(parent).ok().map(|p| p.join(file_name))
}
