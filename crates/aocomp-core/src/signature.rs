//! SHA-256 digests and content typing by leading bytes.

use crate::AoError;
use crate::Result;
use sha2::Digest;
use sha2::Sha256;
use std::fmt;
use std::fs::File;
use std::io;
use std::io::Read;
use std::io::Write;
use std::path::Path;

/// Number of leading bytes shown as the magic signature.
pub const MAGIC_LEN: usize = 16;

const HASH_BUFFER_SIZE: usize = 64 * 1024;

/// Content type recognized from a file's first bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// PNG image.
    Png,
    /// JPEG image.
    Jpeg,
    /// RIFF container, usually WAV audio.
    Riff,
    /// ZIP archive.
    Zip,
    /// Windows bitmap.
    Bmp,
    /// No known signature.
    Unknown,
}

impl FileType {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Riff => "RIFF (possible WAV)",
            Self::Zip => "ZIP",
            Self::Bmp => "BMP",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fewest leading bytes any detection looks at.
pub const MIN_SIGNATURE_LEN: usize = 4;

/// Detects the content type from leading bytes. First match wins.
///
/// Inputs shorter than [`MIN_SIGNATURE_LEN`] are always
/// [`FileType::Unknown`], even when a shorter rule would match.
///
/// # Examples
///
/// ```
/// use aocomp_core::FileType;
/// use aocomp_core::signature::detect_type;
///
/// assert_eq!(detect_type(b"PK\x03\x04rest"), FileType::Zip);
/// assert_eq!(detect_type(&[0xFF, 0xD8, 0xFF, 0xE0]), FileType::Jpeg);
/// assert_eq!(detect_type(&[0xFF, 0xD8]), FileType::Unknown);
/// assert_eq!(detect_type(b"hello"), FileType::Unknown);
/// ```
#[must_use]
pub fn detect_type(bytes: &[u8]) -> FileType {
    if bytes.len() < MIN_SIGNATURE_LEN {
        return FileType::Unknown;
    }
    match bytes {
        [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, ..] => FileType::Png,
        [0xFF, 0xD8, ..] => FileType::Jpeg,
        [0x52, 0x49, 0x46, 0x46, ..] => FileType::Riff,
        [0x50, 0x4B, 0x03, 0x04, ..] => FileType::Zip,
        [0x42, 0x4D, ..] => FileType::Bmp,
        _ => FileType::Unknown,
    }
}

/// Upper-case, space-separated hex of the first `min(n, len)` bytes.
///
/// ```
/// use aocomp_core::signature::first_bytes_hex;
///
/// assert_eq!(first_bytes_hex(&[0x50, 0x4b, 0x03, 0x04], 2), "50 4B");
/// assert_eq!(first_bytes_hex(&[], 16), "");
/// ```
#[must_use]
pub fn first_bytes_hex(bytes: &[u8], n: usize) -> String {
    bytes
        .iter()
        .take(n)
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lower-case hex SHA-256 of a byte slice.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Streams a reader through SHA-256, returning the hex digest and the number
/// of bytes consumed.
///
/// # Errors
///
/// Returns any read error from `reader`.
pub fn sha256_reader<R: Read>(reader: &mut R) -> io::Result<(String, u64)> {
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
        total += n as u64;
    }
    Ok((hex::encode(hasher.finalize()), total))
}

/// Lower-case hex SHA-256 of a file's content.
///
/// # Errors
///
/// Returns [`AoError::IoRead`] if the file cannot be opened or read.
pub fn sha256_file_hex<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let read_err = |source| AoError::IoRead {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(read_err)?;
    let (digest, _) = sha256_reader(&mut file).map_err(read_err)?;
    Ok(digest)
}

/// What a [`ContentScanner`] saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDigest {
    /// Lower-case hex SHA-256 of all bytes.
    pub sha256: String,
    /// Up to [`MAGIC_LEN`] leading bytes.
    pub head: Vec<u8>,
    /// Total bytes written.
    pub len: u64,
}

impl ContentDigest {
    /// Type detected from the leading bytes.
    #[must_use]
    pub fn detected(&self) -> FileType {
        detect_type(&self.head)
    }

    /// Hex rendering of the leading bytes.
    #[must_use]
    pub fn magic_hex(&self) -> String {
        first_bytes_hex(&self.head, MAGIC_LEN)
    }
}

/// `Write` sink that hashes everything written and keeps the first
/// [`MAGIC_LEN`] bytes, so content can be inspected with `io::copy` without
/// buffering it.
///
/// # Examples
///
/// ```
/// use aocomp_core::signature::ContentScanner;
/// use std::io::Write;
///
/// let mut scanner = ContentScanner::new();
/// scanner.write_all(b"BM and more").unwrap();
/// let digest = scanner.finish();
/// assert_eq!(digest.len, 11);
/// assert_eq!(digest.detected().label(), "BMP");
/// ```
#[derive(Default)]
pub struct ContentScanner {
    hasher: Sha256,
    head: Vec<u8>,
    len: u64,
}

impl ContentScanner {
    /// Creates an empty scanner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the digest of everything written so far.
    #[must_use]
    pub fn finish(self) -> ContentDigest {
        ContentDigest {
            sha256: hex::encode(self.hasher.finalize()),
            head: self.head,
            len: self.len,
        }
    }
}

impl Write for ContentScanner {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let wanted = MAGIC_LEN.saturating_sub(self.head.len()).min(buf.len());
        self.head.extend_from_slice(&buf[..wanted]);
        self.hasher.update(buf);
        self.len += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
