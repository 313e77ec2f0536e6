//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that discovery code can be
//! unit-tested without touching the real filesystem.  Production code uses
//! [`SystemFileSystemOps`]; tests use `MockFileSystemOps`.

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Lazily produced directory entries.
pub type DirEntries<'a> = Box<dyn Iterator<Item = PathBuf> + 'a>;

/// Abstraction over filesystem queries used by tasks.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if `path` is a regular file (not a directory or broken symlink).
    fn is_file(&self, path: &Path) -> bool;

    /// Returns `true` if `path` is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Iterate over the immediate child paths inside `path`.
    ///
    /// Entries are produced as the listing is read; each call starts a fresh
    /// listing.  Entries that fail to read are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be opened as a directory.
    fn read_dir<'a>(&'a self, path: &Path) -> Result<DirEntries<'a>>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir<'a>(&'a self, path: &Path) -> Result<DirEntries<'a>> {
        let entries = std::fs::read_dir(path)?;
        Ok(Box::new(entries.filter_map(|e| e.ok().map(|entry| entry.path()))))
    }
}

/// Mock [`FileSystemOps`] for unit tests.
///
/// Pre-configure regular files and directory listings using the
/// builder-style methods, then pass `Arc::new(mock)` wherever a
/// [`FileSystemOps`] is expected.
///
/// # Example
///
/// ```ignore
/// use luet_pm_installer::operations::MockFileSystemOps;
/// use std::path::PathBuf;
///
/// let fs = MockFileSystemOps::new()
///     .with_file("/src/locale/fr/LC_MESSAGES/luet_pm_ui.mo")
///     .with_dir_entries("/src/locale", vec![PathBuf::from("/src/locale/fr")]);
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    files: Vec<PathBuf>,
    dirs: std::collections::HashMap<PathBuf, Vec<PathBuf>>,
    listings: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `path` as a regular file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        let p = path.into();
        if !self.files.contains(&p) {
            self.files.push(p);
        }
        self
    }

    /// Set the directory entries returned by [`FileSystemOps::read_dir`] for `dir`.
    ///
    /// Also marks `dir` itself as an existing directory.
    #[must_use]
    pub fn with_dir_entries(mut self, dir: impl Into<PathBuf>, entries: Vec<PathBuf>) -> Self {
        self.dirs.insert(dir.into(), entries);
        self
    }

    /// Mark `dir` as an existing, empty directory unless entries were set.
    #[must_use]
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dirs.entry(dir.into()).or_default();
        self
    }

    /// Number of `read_dir` calls made so far.
    #[must_use]
    pub fn listing_count(&self) -> usize {
        self.listings.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl FileSystemOps for MockFileSystemOps {
    fn is_file(&self, path: &Path) -> bool {
        self.files.iter().any(|p| p == path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains_key(path)
    }

    fn read_dir<'a>(&'a self, path: &Path) -> Result<DirEntries<'a>> {
        let entries = self
            .dirs
            .get(path)
            .ok_or_else(|| anyhow::anyhow!("mock: no entries configured for {}", path.display()))?;
        self.listings
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(Box::new(entries.iter().cloned()))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn system_read_dir_lists_children() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("fr")).unwrap();
        std::fs::write(dir.path().join("README"), "x").unwrap();

        let ops = SystemFileSystemOps;
        let mut entries: Vec<PathBuf> = ops.read_dir(dir.path()).unwrap().collect();
        entries.sort();
        assert_eq!(
            entries,
            vec![dir.path().join("README"), dir.path().join("fr")]
        );
        assert!(ops.is_dir(&dir.path().join("fr")));
        assert!(ops.is_file(&dir.path().join("README")));
    }

    #[test]
    fn system_read_dir_missing_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SystemFileSystemOps.read_dir(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn mock_reports_configured_entries() {
        let ops = MockFileSystemOps::new()
            .with_file("/a/file")
            .with_dir_entries("/a", vec![PathBuf::from("/a/file")]);
        assert!(ops.is_file(Path::new("/a/file")));
        assert!(ops.is_dir(Path::new("/a")));
        assert!(!ops.is_dir(Path::new("/b")));
        let entries: Vec<PathBuf> = ops.read_dir(Path::new("/a")).unwrap().collect();
        assert_eq!(entries, vec![PathBuf::from("/a/file")]);
        assert_eq!(ops.listing_count(), 1);
    }
}
