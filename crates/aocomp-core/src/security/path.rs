//! Containment check for extraction targets.

use crate::Result;
use std::fs;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Resolves `path` to an absolute, symlink-free form, even when it does not
/// exist yet.
///
/// The longest existing ancestor is canonicalized; the remaining components
/// are appended lexically, with `.` dropped and `..` popping one level.
///
/// # Errors
///
/// Returns any I/O error other than "not found" raised while canonicalizing.
pub fn resolve(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let components: Vec<Component<'_>> = absolute.components().collect();

    // The filesystem root always canonicalizes, so the loop ends with a base.
    let mut split = components.len();
    let mut base = None;
    while split > 0 {
        let prefix: PathBuf = components[..split].iter().collect();
        match fs::canonicalize(&prefix) {
            Ok(canonical) => {
                base = Some(canonical);
                break;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => split -= 1,
            Err(e) => return Err(e.into()),
        }
    }
    let mut resolved = base.ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("no existing ancestor for {}", path.display()),
        )
    })?;

    for component in &components[split..] {
        match component {
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(part) => resolved.push(part),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    Ok(resolved)
}

/// Returns `true` when `candidate` resolves to `root` or to a path beneath it.
///
/// The comparison is component-wise, so `/tmp/outside` is not under
/// `/tmp/out`. Callers should treat an error as "not within".
///
/// # Errors
///
/// Propagates errors from [`resolve`].
///
/// # Examples
///
/// ```no_run
/// use aocomp_core::security::within_root;
/// use std::path::Path;
///
/// let root = Path::new("/tmp/out");
/// assert!(within_root(root, &root.join("a/b.txt"))?);
/// assert!(!within_root(root, &root.join("../evil.txt"))?);
/// # Ok::<(), aocomp_core::AoError>(())
/// ```
pub fn within_root(root: &Path, candidate: &Path) -> Result<bool> {
    let root = resolve(root)?;
    let candidate = resolve(candidate)?;
    Ok(candidate.starts_with(&root))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_root_is_within_itself() {
        let temp = TempDir::new().unwrap();
        assert!(within_root(temp.path(), temp.path()).unwrap());
    }

    #[test]
    fn test_nested_missing_path() {
        let temp = TempDir::new().unwrap();
        let candidate = temp.path().join("a/b/c/file.txt");
        assert!(within_root(temp.path(), &candidate).unwrap());
    }

    #[test]
    fn test_parent_escape() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("out");
        fs::create_dir(&root).unwrap();

        assert!(!within_root(&root, &root.join("../evil.txt")).unwrap());
        assert!(!within_root(&root, &root.join("a/../../evil.txt")).unwrap());
        assert!(within_root(&root, &root.join("a/../ok.txt")).unwrap());
        assert!(within_root(&root, &root.join("./x/./y")).unwrap());
    }

    #[test]
    fn test_absolute_candidate() {
        let temp = TempDir::new().unwrap();
        let candidate = temp.path().join("/etc/passwd");
        assert!(!within_root(temp.path(), &candidate).unwrap());
    }

    #[test]
    fn test_sibling_with_shared_prefix() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("out");
        fs::create_dir(&root).unwrap();
        let sibling = temp.path().join("outside-of-root/file.txt");

        assert!(!within_root(&root, &sibling).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_escape() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let root = temp.path().join("out");
        fs::create_dir(&root).unwrap();
        symlink(outside.path(), root.join("link")).unwrap();

        assert!(!within_root(&root, &root.join("link/file.txt")).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_root() {
        use std::os::unix::fs::symlink;

        let temp = TempDir::new().unwrap();
        let real = temp.path().join("real");
        fs::create_dir(&real).unwrap();
        let alias = temp.path().join("alias");
        symlink(&real, &alias).unwrap();

        assert!(within_root(&alias, &real.join("f.txt")).unwrap());
    }

    #[test]
    fn test_resolve_pops_through_missing_components() {
        let temp = TempDir::new().unwrap();
        let base = fs::canonicalize(temp.path()).unwrap();
        let resolved = resolve(&temp.path().join("missing/../other/./f")).unwrap();
        assert_eq!(resolved, base.join("other/f"));
    }
}
