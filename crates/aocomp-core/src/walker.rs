//! Enumeration of the regular files beneath a source directory.

use crate::AoError;
use crate::Result;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use walkdir::DirEntry;
use walkdir::WalkDir;

/// Walks a directory tree and yields every regular file, depth-first.
///
/// Siblings are visited in file-name order so the archive layout is stable
/// across runs. Symlinks that point at files count as files; symlinks to
/// directories are not followed.
///
/// # Examples
///
/// ```no_run
/// use aocomp_core::walker::SourceWalker;
///
/// let walker = SourceWalker::new("./resources");
/// for file in walker.files() {
///     println!("{}", file?.display());
/// }
/// # Ok::<(), aocomp_core::AoError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SourceWalker {
    root: PathBuf,
    excluded: Option<PathBuf>,
}

impl SourceWalker {
    /// Creates a walker rooted at `root`.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            excluded: None,
        }
    }

    /// Skips one path, compared against the walked paths as-is.
    #[must_use]
    pub fn exclude<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.excluded = Some(path.as_ref().to_path_buf());
        self
    }

    /// Root directory of the walk.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily yields the path of every regular file under the root.
    ///
    /// # Errors
    ///
    /// Items are errors when a directory cannot be listed or a file's
    /// metadata cannot be read.
    pub fn files(&self) -> impl Iterator<Item = Result<PathBuf>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => match self.classify(&entry) {
                    Ok(true) => Some(Ok(entry.into_path())),
                    Ok(false) => None,
                    Err(e) => Some(Err(e)),
                },
                Err(e) => Some(Err(AoError::Io(std::io::Error::other(format!(
                    "walkdir error: {e}"
                ))))),
            })
    }

    /// Returns `true` if the source holds at least one regular file.
    ///
    /// # Errors
    ///
    /// Returns the first walk error met before a file is found.
    pub fn has_files(&self) -> Result<bool> {
        self.files().next().transpose().map(|first| first.is_some())
    }

    /// Sum of the sizes of all regular files.
    ///
    /// # Errors
    ///
    /// Returns the first walk or metadata error.
    pub fn total_size(&self) -> Result<u64> {
        let mut total = 0u64;
        for path in self.files() {
            let path = path?;
            let metadata = fs::metadata(&path).map_err(|source| AoError::IoRead {
                path: path.clone(),
                source,
            })?;
            total += metadata.len();
        }
        Ok(total)
    }

    fn classify(&self, entry: &DirEntry) -> Result<bool> {
        if self.excluded.as_deref() == Some(entry.path()) {
            log::debug!("skipping {} (output archive)", entry.path().display());
            return Ok(false);
        }

        let file_type = entry.file_type();
        if file_type.is_file() {
            return Ok(true);
        }
        if !file_type.is_symlink() {
            return Ok(false);
        }

        // Follow the link once to see what it points at; dangling links are skipped.
        match fs::metadata(entry.path()) {
            Ok(target) => Ok(target.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(AoError::IoRead {
                path: entry.path().to_path_buf(),
                source,
            }),
        }
    }
}

/// Archive entry name for `file` relative to `root`, using `/` separators.
///
/// # Errors
///
/// Returns [`AoError::InvalidInput`] if `file` is not under `root` or the
/// relative path is not valid UTF-8.
///
/// # Examples
///
/// ```
/// use aocomp_core::walker::entry_name;
/// use std::path::Path;
///
/// let name = entry_name(Path::new("/data/src"), Path::new("/data/src/Graficos/1.bmp"))?;
/// assert_eq!(name, "Graficos/1.bmp");
/// # Ok::<(), aocomp_core::AoError>(())
/// ```
pub fn entry_name(root: &Path, file: &Path) -> Result<String> {
    let relative = file.strip_prefix(root).map_err(|_| {
        AoError::invalid_input(format!(
            "{} is not under {}",
            file.display(),
            root.display()
        ))
    })?;

    let parts = relative
        .components()
        .map(|c| {
            c.as_os_str().to_str().ok_or_else(|| {
                AoError::invalid_input(format!("path is not valid UTF-8: {}", file.display()))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(parts.join("/").replace('\\', "/"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(walker: &SourceWalker) -> Vec<String> {
        walker
            .files()
            .map(|p| entry_name(walker.root(), &p.unwrap()).unwrap())
            .collect()
    }

    #[test]
    fn test_walk_sorted_depth_first() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("b/inner")).unwrap();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("z.txt"), "z").unwrap();
        fs::write(root.join("a/1.txt"), "1").unwrap();
        fs::write(root.join("b/inner/2.txt"), "2").unwrap();
        fs::write(root.join("b/0.txt"), "0").unwrap();

        let walker = SourceWalker::new(root);
        assert_eq!(
            names(&walker),
            vec!["a/1.txt", "b/0.txt", "b/inner/2.txt", "z.txt"]
        );
    }

    #[test]
    fn test_empty_dirs_yield_nothing() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("x/y/z")).unwrap();

        let walker = SourceWalker::new(temp.path());
        assert!(!walker.has_files().unwrap());
        assert_eq!(walker.total_size().unwrap(), 0);
    }

    #[test]
    fn test_total_size() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a"), vec![0u8; 100]).unwrap();
        fs::create_dir(temp.path().join("d")).unwrap();
        fs::write(temp.path().join("d/b"), vec![0u8; 23]).unwrap();

        assert_eq!(SourceWalker::new(temp.path()).total_size().unwrap(), 123);
    }

    #[test]
    fn test_exclude() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("keep.txt"), "k").unwrap();
        fs::write(temp.path().join("out.ao"), "o").unwrap();

        let walker = SourceWalker::new(temp.path()).exclude(temp.path().join("out.ao"));
        assert_eq!(names(&walker), vec!["keep.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("target.txt"), "t").unwrap();
        fs::create_dir(outside.path().join("dir")).unwrap();
        fs::write(outside.path().join("dir/hidden.txt"), "h").unwrap();

        symlink(outside.path().join("target.txt"), temp.path().join("file_link")).unwrap();
        symlink(outside.path().join("dir"), temp.path().join("dir_link")).unwrap();
        symlink(temp.path().join("missing"), temp.path().join("dangling")).unwrap();

        let walker = SourceWalker::new(temp.path());
        assert_eq!(names(&walker), vec!["file_link"]);
    }

    #[test]
    fn test_missing_root_is_error() {
        let walker = SourceWalker::new("/nonexistent/aocomp/root");
        assert!(walker.has_files().is_err());
    }

    #[test]
    fn test_entry_name_outside_root() {
        let err = entry_name(Path::new("/a/b"), Path::new("/c/d")).unwrap_err();
        assert!(matches!(err, AoError::InvalidInput { .. }));
    }
}
