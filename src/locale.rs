//! Discovery of compiled translations under a locale root.
//!
//! A locale root holds one directory per language code, each with the
//! artifact at `LC_MESSAGES/<domain>.mo`:
//!
//! ```text
//! locale/
//! ├── de/LC_MESSAGES/luet_pm_ui.mo
//! ├── fr/LC_MESSAGES/luet_pm_ui.mo
//! └── it/            (no artifact, skipped)
//! ```
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use crate::operations::FileSystemOps;

/// A language with a compiled translation ready to install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleEntry {
    /// Language code, the directory name under the locale root.
    pub language: String,
    /// Path of the translation artifact in the source tree.
    pub translation_path: PathBuf,
}

impl LocaleEntry {
    /// Destination of this translation under `destination_root`.
    ///
    /// ```
    /// use luet_pm_installer::locale::LocaleEntry;
    /// use std::path::{Path, PathBuf};
    ///
    /// let entry = LocaleEntry {
    ///     language: "fr".into(),
    ///     translation_path: PathBuf::from("locale/fr/LC_MESSAGES/luet_pm_ui.mo"),
    /// };
    /// assert_eq!(
    ///     entry.destination(
///         Path::new("/usr/share/locale"),
///         Path::new("LC_MESSAGES/luet_pm_ui.mo"),
///     ),
    ///     Path::new("/usr/share/locale/fr/LC_MESSAGES/luet_pm_ui.mo"),
    /// );
    /// ```
    #[must_use]
    pub fn destination(&self, destination_root: &Path, artifact: &Path) -> PathBuf {
        destination_root.join(&self.language).join(artifact)
    }
}

/// Language codes under `root`, one per subdirectory.
///
/// The listing is read lazily and afresh on every call.  A missing root
/// yields an empty sequence; files directly under the root are ignored.
///
/// # Errors
///
/// Returns an error if `root` exists but cannot be listed.
pub fn languages<'a>(
    fs: &'a dyn FileSystemOps,
    root: &Path,
) -> Result<Box<dyn Iterator<Item = String> + 'a>> {
    if !fs.is_dir(root) {
        return Ok(Box::new(std::iter::empty()));
    }
    let entries = fs
        .read_dir(root)
        .with_context(|| format!("listing locale root {}", root.display()))?;
    Ok(Box::new(entries.filter_map(move |path| {
        if !fs.is_dir(&path) {
            return None;
        }
        path.file_name()?.to_str().map(str::to_string)
    })))
}

/// Languages under `root` that ship `artifact`, with the artifact's path.
///
/// Languages without the artifact are skipped silently.
///
/// # Errors
///
/// See [`languages`].
pub fn discover<'a>(
    fs: &'a dyn FileSystemOps,
    root: &Path,
    artifact: &'a Path,
) -> Result<impl Iterator<Item = LocaleEntry> + use<'a>> {
    let root_owned = root.to_path_buf();
    Ok(languages(fs, root)?.filter_map(move |language| {
        let translation_path = root_owned.join(&language).join(artifact);
        fs.is_file(&translation_path).then(|| LocaleEntry {
            language,
            translation_path,
        })
    }))
}
