//! Archive inspection: file-level metadata plus per-entry sizes, digests and
//! content types.

use crate::AoError;
use crate::LogSink;
use crate::Result;
use crate::format::format_percent;
use crate::format::format_size;
use crate::format::format_timestamp;
use crate::format::reduction_percentage;
use crate::signature::ContentScanner;
use crate::signature::FileType;
use crate::signature::sha256_file_hex;
use std::fs;
use std::fs::File;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use zip::ZipArchive;

/// Metadata of an archive file and its file entries.
#[derive(Debug, Clone)]
pub struct ArchiveInspection {
    /// File name of the archive.
    pub name: String,
    /// Absolute path of the archive.
    pub path: PathBuf,
    /// Size of the archive on disk.
    pub size: u64,
    /// Last modification time, when the platform reports one.
    pub modified: Option<SystemTime>,
    /// Whole-file SHA-256, or the reason it could not be computed.
    pub sha256: std::result::Result<String, String>,
    /// Non-directory entries, in archive order.
    pub entries: Vec<EntryInspection>,
}

/// Metadata of one file entry.
#[derive(Debug, Clone)]
pub struct EntryInspection {
    /// Entry name as stored.
    pub name: String,
    /// Compressed size in bytes.
    pub compressed_size: u64,
    /// Uncompressed size in bytes.
    pub uncompressed_size: u64,
    /// Content details, or the reason the entry could not be read.
    pub content: std::result::Result<ContentDetails, String>,
}

impl EntryInspection {
    /// Space saved by compression in percent, when the entry is not empty.
    #[must_use]
    pub fn ratio(&self) -> Option<f64> {
        (self.uncompressed_size > 0)
            .then(|| reduction_percentage(self.uncompressed_size, self.compressed_size))
    }
}

/// What was learned from an entry's decompressed bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDetails {
    /// Lower-case hex SHA-256 of the content.
    pub sha256: String,
    /// First bytes as upper-case hex.
    pub magic_hex: String,
    /// Type detected from the first bytes.
    pub detected: FileType,
    /// The entry has no content.
    pub is_empty: bool,
}

/// Reads an archive's metadata and every file entry's content.
///
/// Entries are streamed through a hashing sink, so memory use does not grow
/// with entry size. Failures confined to one entry are recorded in that
/// entry's `content`; a whole-file hashing failure in `sha256`.
///
/// # Errors
///
/// Returns an error only if the file cannot be opened as a ZIP archive.
pub fn inspect_archive<P: AsRef<Path>>(archive: P) -> Result<ArchiveInspection> {
    let archive = archive.as_ref();
    let file = File::open(archive).map_err(|source| AoError::IoRead {
        path: archive.to_path_buf(),
        source,
    })?;
    let metadata = file.metadata()?;
    let mut zip = ZipArchive::new(file).map_err(|e| AoError::BadArchive(e.to_string()))?;

    let path = fs::canonicalize(archive).unwrap_or_else(|_| archive.to_path_buf());
    let name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let sha256 = sha256_file_hex(archive).map_err(|e| e.to_string());

    let mut entries = Vec::new();
    for index in 0..zip.len() {
        if let Some(entry) = inspect_entry(&mut zip, index) {
            entries.push(entry);
        }
    }

    Ok(ArchiveInspection {
        name,
        path,
        size: metadata.len(),
        modified: metadata.modified().ok(),
        sha256,
        entries,
    })
}

/// Returns `None` for directory entries.
fn inspect_entry(zip: &mut ZipArchive<File>, index: usize) -> Option<EntryInspection> {
    let (name, compressed_size, uncompressed_size) = match zip.by_index_raw(index) {
        Ok(raw) if raw.is_dir() => return None,
        Ok(raw) => (raw.name().to_string(), raw.compressed_size(), raw.size()),
        Err(e) => {
            return Some(EntryInspection {
                name: format!("#{index}"),
                compressed_size: 0,
                uncompressed_size: 0,
                content: Err(e.to_string()),
            });
        }
    };

    let content = zip
        .by_index(index)
        .map_err(|e| e.to_string())
        .and_then(|mut entry| {
            let mut scanner = ContentScanner::new();
            io::copy(&mut entry, &mut scanner).map_err(|e| e.to_string())?;
            Ok(scanner.finish())
        })
        .map(|digest| ContentDetails {
            magic_hex: digest.magic_hex(),
            detected: digest.detected(),
            is_empty: digest.len == 0,
            sha256: digest.sha256,
        });

    Some(EntryInspection {
        name,
        compressed_size,
        uncompressed_size,
        content,
    })
}

/// Inspects `archive` and renders the result into `sink`.
///
/// If the archive cannot be opened, a single error record is emitted.
pub fn inspect<P: AsRef<Path>>(archive: P, sink: &mut dyn LogSink) {
    match inspect_archive(archive) {
        Ok(inspection) => render(&inspection, sink),
        Err(e) => sink.error(&format!("Error inspecting file: {e}")),
    }
}

/// Renders an inspection as log records.
pub fn render(inspection: &ArchiveInspection, sink: &mut dyn LogSink) {
    sink.info("=== FILE INSPECTION ===");
    sink.info(&format!("File: {}", inspection.name));
    sink.info(&format!("Path: {}", inspection.path.display()));
    sink.info(&format!("Size: {}", format_size(inspection.size)));
    let modified = inspection
        .modified
        .map_or_else(|| "unknown".to_string(), format_timestamp);
    sink.info(&format!("Last Modified: {modified}"));
    sink.blank();

    match &inspection.sha256 {
        Ok(digest) => sink.info(&format!("File SHA-256: {digest}")),
        Err(reason) => sink.error(&format!("Could not calculate file SHA-256: {reason}")),
    }
    sink.blank();

    sink.info("=== ARCHIVE CONTENTS ===");
    sink.info(&format!("Total files: {}", inspection.entries.len()));
    sink.blank();

    if inspection.entries.is_empty() {
        sink.warn("No files found in the archive.");
        return;
    }

    for entry in &inspection.entries {
        render_entry(entry, sink);
    }
}

fn render_entry(entry: &EntryInspection, sink: &mut dyn LogSink) {
    let details = match &entry.content {
        Ok(details) => details,
        Err(reason) => {
            sink.error(&format!("Error inspecting '{}': {reason}", entry.name));
            sink.blank();
            return;
        }
    };

    sink.info(&format!("--- {} ---", entry.name));
    sink.info(&format!(
        "Compressed size: {}",
        format_size(entry.compressed_size)
    ));
    sink.info(&format!(
        "Uncompressed size: {}",
        format_size(entry.uncompressed_size)
    ));
    if let Some(ratio) = entry.ratio() {
        sink.info(&format!("Compression ratio: {}", format_percent(ratio)));
    }

    if details.is_empty {
        sink.warn("File is empty.");
    } else {
        sink.info(&format!("SHA-256: {}", details.sha256));
        sink.info(&format!("Magic signature: {}", details.magic_hex));
        sink.info(&format!("Detected type: {}", details.detected));
    }
    sink.blank();
}
