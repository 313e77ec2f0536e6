//! File-system resource helpers.
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::io;
use std::path::Path;

use crate::resources::error::ResourceError;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns [`ResourceError::DirectoryCreationFailed`] if the directory cannot
/// be created.
pub fn ensure_parent_dir(path: &Path) -> Result<(), ResourceError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| {
            ResourceError::DirectoryCreationFailed {
                path: parent.to_path_buf(),
                source,
            }
        })?;
    }
    Ok(())
}

/// Remove an existing file or symlink at `path`, including broken symlinks.
///
/// Does nothing if `path` does not exist.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed.
pub fn remove_existing(path: &Path) -> Result<(), ResourceError> {
    if path.symlink_metadata().is_ok() {
        std::fs::remove_file(path).map_err(|e| ResourceError::from_write(path, e))?;
    }
    Ok(())
}

/// SHA-256 digest of the file at `path`, as lowercase hex.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        write!(hex, "{byte:02x}").unwrap_or(());
    }
    Ok(hex)
}

/// Whether two files have identical content.
///
/// Sizes are compared first so differing files are usually rejected without
/// hashing.
///
/// # Errors
///
/// Returns an error if either file cannot be read.
pub fn same_content(a: &Path, b: &Path) -> io::Result<bool> {
    if std::fs::metadata(a)?.len() != std::fs::metadata(b)?.len() {
        return Ok(false);
    }
    Ok(sha256_file(a)? == sha256_file(b)?)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ensure_parent_dir_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("file.txt");
        ensure_parent_dir(&nested).unwrap();
        assert!(dir.path().join("a").join("b").is_dir());
    }

    #[test]
    fn ensure_parent_dir_noop_when_parent_exists() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        ensure_parent_dir(&file).unwrap();
        assert!(dir.path().exists());
    }

    #[test]
    fn ensure_parent_dir_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("blocker"), "x").unwrap();
        let err = ensure_parent_dir(&dir.path().join("blocker").join("sub").join("f")).unwrap_err();
        assert!(matches!(err, ResourceError::DirectoryCreationFailed { .. }));
    }

    #[test]
    fn remove_existing_removes_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("target");
        std::fs::write(&file, "content").unwrap();
        remove_existing(&file).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn remove_existing_noop_when_path_absent() {
        let dir = tempfile::tempdir().unwrap();
        remove_existing(&dir.path().join("nonexistent")).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn remove_existing_removes_broken_symlink() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink("/nonexistent/target", &link).unwrap();
        remove_existing(&link).unwrap();
        assert!(link.symlink_metadata().is_err());
    }

    #[test]
    fn sha256_known_content() {
        // echo -n "hello world" | sha256sum
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        std::fs::write(&file, "hello world").unwrap();
        assert_eq!(
            sha256_file(&file).unwrap(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn same_content_detects_equal_and_different_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        let c = dir.path().join("c");
        std::fs::write(&a, "luet").unwrap();
        std::fs::write(&b, "luet").unwrap();
        std::fs::write(&c, "teul").unwrap();
        assert!(same_content(&a, &b).unwrap());
        assert!(!same_content(&a, &c).unwrap());
    }
}
