//! Run configuration: roots, the loaded manifest and interpreter overrides.
pub mod manifest;
pub mod site_packages;
pub mod toml_loader;
pub mod validation;

use anyhow::{Context, Result};
use std::fmt;
use std::path::{Component, Path, PathBuf};

use manifest::Manifest;
use site_packages::PythonVersion;

/// File name of a manifest shipped next to the files it installs.
pub const MANIFEST_FILE: &str = "install.toml";

/// Where the active manifest came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestOrigin {
    /// Read from a file on disk.
    File(PathBuf),
    /// Compiled into the binary.
    Builtin,
}

impl fmt::Display for ManifestOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Builtin => write!(f, "<builtin>"),
        }
    }
}

/// Everything a run needs to know before touching the filesystem.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory containing the files to install.
    pub source_root: PathBuf,
    /// Prefix under which every absolute destination is placed.
    pub dest_root: PathBuf,
    /// The installation instructions.
    pub manifest: Manifest,
    /// Where `manifest` was loaded from.
    pub manifest_origin: ManifestOrigin,
    /// Library directory suffix for the `site-packages` path.
    pub lib_suffix: String,
    /// Interpreter version override from the command line.
    pub python_version: Option<PythonVersion>,
}

impl Config {
    /// Load the manifest for `source_root`.
    ///
    /// An explicit `manifest_path` wins; otherwise `<source_root>/install.toml`
    /// is used when present, falling back to the built-in manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or parsed.
    pub fn load(
        source_root: &Path,
        dest_root: &Path,
        manifest_path: Option<&Path>,
    ) -> Result<Self> {
        let candidate = source_root.join(MANIFEST_FILE);
        let (manifest, manifest_origin) = match manifest_path {
            Some(path) => (
                manifest::load(path).context("loading manifest")?,
                ManifestOrigin::File(path.to_path_buf()),
            ),
            None if candidate.is_file() => (
                manifest::load(&candidate).context("loading manifest")?,
                ManifestOrigin::File(candidate),
            ),
            None => (
                Manifest::builtin().context("loading built-in manifest")?,
                ManifestOrigin::Builtin,
            ),
        };

        Ok(Self {
            source_root: source_root.to_path_buf(),
            dest_root: dest_root.to_path_buf(),
            manifest,
            manifest_origin,
            lib_suffix: site_packages::lib_suffix_from_env(),
            python_version: None,
        })
    }

    /// Absolute path of a manifest source.
    #[must_use]
    pub fn source_path(&self, relative: &Path) -> PathBuf {
        self.source_root.join(relative)
    }

    /// Place a manifest destination under the destination root.
    ///
    /// `..` components are resolved lexically and stop at the destination
    /// root, so the result never leaves it.
    ///
    /// # Examples
    ///
    /// ```
    /// use luet_pm_installer::config::Config;
    /// use std::path::Path;
    ///
    /// # let mut config = Config::load(Path::new("/nonexistent"), Path::new("/"), None).unwrap();
    /// config.dest_root = "/tmp/pkg".into();
    /// assert_eq!(
    ///     config.destination_path(Path::new("/usr/bin/luet_pm_gui.py")),
    ///     Path::new("/tmp/pkg/usr/bin/luet_pm_gui.py"),
    /// );
    /// ```
    #[must_use]
    pub fn destination_path(&self, destination: &Path) -> PathBuf {
        let mut relative = PathBuf::new();
        for component in destination.components() {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::ParentDir => {
                    relative.pop();
                }
                Component::RootDir | Component::Prefix(_) | Component::CurDir => {}
            }
        }
        self.dest_root.join(relative)
    }

    /// Check the manifest for likely mistakes.
    #[must_use]
    pub fn validate(&self) -> Vec<validation::ValidationWarning> {
        validation::validate_manifest(&self.manifest, &self.source_root)
    }
}
