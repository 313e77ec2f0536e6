//! Installation manifest: the fixed list of files a run places on disk.
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use super::toml_loader;
use crate::error::ConfigError;

/// Manifest compiled into the binary, used when no manifest file is found.
const BUILTIN_MANIFEST: &str = include_str!("default_manifest.toml");

/// Octal permission bits for an installed file.
///
/// # Examples
///
/// ```
/// use luet_pm_installer::config::manifest::FileMode;
///
/// let mode = FileMode::parse("0755").unwrap();
/// assert_eq!(mode.bits(), 0o755);
/// assert_eq!(mode.to_string(), "755");
/// assert!(FileMode::parse("9").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct FileMode(u32);

impl FileMode {
    /// Parse a 3 or 4 digit octal mode string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMode`] if `s` is not octal or is out of range.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let s = s.trim();
        if !(3..=4).contains(&s.len()) {
            return Err(ConfigError::InvalidMode(s.to_string()));
        }
        u32::from_str_radix(s, 8)
            .ok()
            .filter(|bits| *bits <= 0o7777)
            .map(Self)
            .ok_or_else(|| ConfigError::InvalidMode(s.to_string()))
    }

    /// Create a mode from raw permission bits (masked to `0o7777`).
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & 0o7777)
    }

    /// The raw permission bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl TryFrom<String> for FileMode {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:o}", self.0)
    }
}

/// One installation instruction: copy `source` to `destination` with `mode`,
/// optionally setting ownership.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallEntry {
    /// Path of the file to install, relative to the source root.
    pub source: PathBuf,
    /// Absolute destination path (placed under the destination root).
    pub destination: PathBuf,
    /// Permission bits applied to the destination.
    pub mode: FileMode,
    /// User name or numeric uid to own the destination.
    #[serde(default)]
    pub owner: Option<String>,
    /// Group name or numeric gid to own the destination.
    #[serde(default)]
    pub group: Option<String>,
}

/// Where compiled translations come from and where they go.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocaleSpec {
    /// Locale root relative to the source root; one subdirectory per language.
    pub source: PathBuf,
    /// System locale directory.
    #[serde(default = "default_locale_destination")]
    pub destination: PathBuf,
    /// Gettext domain; the artifact is `LC_MESSAGES/<domain>.mo`.
    #[serde(default = "default_locale_domain")]
    pub domain: String,
    /// Permission bits applied to installed translations.
    #[serde(default = "default_data_mode")]
    pub mode: FileMode,
}

impl LocaleSpec {
    /// Path of the translation artifact relative to a language directory.
    #[must_use]
    pub fn artifact(&self) -> PathBuf {
        Path::new("LC_MESSAGES").join(format!("{}.mo", self.domain))
    }
}

/// The shared core module placed in the interpreter's `site-packages`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreModuleSpec {
    /// Module file relative to the source root.
    pub source: PathBuf,
    /// Interpreter queried for its version.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    /// Fixed `MAJOR.MINOR` version; skips the interpreter query when set.
    #[serde(default)]
    pub python_version: Option<String>,
    /// Permission bits applied to the installed module.
    #[serde(default = "default_data_mode")]
    pub mode: FileMode,
}

/// The complete set of installation instructions for a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Files installed in order.
    #[serde(default)]
    pub files: Vec<InstallEntry>,
    /// Optional translation catalogue.
    #[serde(default)]
    pub locale: Option<LocaleSpec>,
    /// Optional core module.
    #[serde(default)]
    pub core_module: Option<CoreModuleSpec>,
}

impl Manifest {
    /// The manifest compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded manifest is malformed.
    pub fn builtin() -> Result<Self, ConfigError> {
        toml_loader::parse_config(Path::new("<builtin>"), BUILTIN_MANIFEST)
    }
}

fn default_locale_destination() -> PathBuf {
    PathBuf::from("/usr/share/locale")
}

fn default_locale_domain() -> String {
    "luet_pm_ui".to_string()
}

fn default_interpreter() -> String {
    "python3".to_string()
}

const fn default_data_mode() -> FileMode {
    FileMode(0o644)
}

/// Load a manifest from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not match the schema.
pub fn load(path: &Path) -> Result<Manifest, ConfigError> {
    toml_loader::load_config(path)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn parse_three_and_four_digit_modes() {
        assert_eq!(FileMode::parse("644").unwrap().bits(), 0o644);
        assert_eq!(FileMode::parse("0755").unwrap().bits(), 0o755);
        assert_eq!(FileMode::parse("4755").unwrap().bits(), 0o4755);
    }

    #[test]
    fn reject_non_octal_modes() {
        assert!(FileMode::parse("648").is_err());
        assert!(FileMode::parse("rw-").is_err());
        assert!(FileMode::parse("64").is_err());
        assert!(FileMode::parse("07555").is_err());
    }

    #[test]
    fn from_bits_masks_file_type() {
        assert_eq!(FileMode::from_bits(0o100_644).bits(), 0o644);
    }

    #[test]
    fn builtin_manifest_parses() {
        let manifest = Manifest::builtin().unwrap();
        assert_eq!(manifest.files.len(), 6);
        assert!(manifest.locale.is_some());
        assert!(manifest.core_module.is_some());
    }

    #[test]
    fn builtin_manifest_terminal_front_ends_parse_when_enabled() {
        let enabled: String = BUILTIN_MANIFEST
            .lines()
            .filter_map(|line| match line.strip_prefix("# ") {
                Some(toml) if toml.starts_with("[[") || toml.contains(" = ") => Some(toml),
                Some(_) => None,
                None => Some(line),
            })
            .collect::<Vec<_>>()
            .join("\n");
        let manifest: Manifest =
            toml_loader::parse_config(Path::new("<enabled>"), &enabled).unwrap();
        let launchers: Vec<&Path> = manifest
            .files
            .iter()
            .map(|e| e.destination.as_path())
            .filter(|d| d.starts_with("/usr/bin"))
            .collect();
        assert!(launchers.contains(&Path::new("/usr/bin/luet_pm_tui.py")));
        assert!(launchers.contains(&Path::new("/usr/bin/luet_pm_ncurses.py")));
        assert_eq!(manifest.files.len(), 8);
    }

    #[test]
    fn builtin_manifest_launchers_are_executable() {
        let manifest = Manifest::builtin().unwrap();
        for entry in &manifest.files {
            if entry.destination.starts_with("/usr/bin") {
                assert_eq!(entry.mode.bits(), 0o755, "{}", entry.destination.display());
            } else {
                assert_eq!(entry.mode.bits(), 0o644, "{}", entry.destination.display());
            }
        }
    }

    #[test]
    fn builtin_manifest_only_rules_file_sets_ownership() {
        let manifest = Manifest::builtin().unwrap();
        let owned: Vec<&InstallEntry> = manifest
            .files
            .iter()
            .filter(|e| e.owner.is_some() || e.group.is_some())
            .collect();
        assert_eq!(owned.len(), 1);
        assert_eq!(
            owned[0].destination,
            PathBuf::from("/etc/polkit-1/rules.d/99-luet.rules")
        );
        assert_eq!(owned[0].owner.as_deref(), Some("root"));
        assert_eq!(owned[0].group.as_deref(), Some("root"));
    }

    #[test]
    fn locale_defaults_apply() {
        let manifest: Manifest = toml::from_str("[locale]\nsource = \"po\"\n").unwrap();
        let locale = manifest.locale.unwrap();
        assert_eq!(locale.destination, PathBuf::from("/usr/share/locale"));
        assert_eq!(locale.domain, "luet_pm_ui");
        assert_eq!(locale.mode.bits(), 0o644);
        assert_eq!(
            locale.artifact(),
            PathBuf::from("LC_MESSAGES/luet_pm_ui.mo")
        );
    }

    #[test]
    fn core_module_defaults_apply() {
        let manifest: Manifest =
            toml::from_str("[core_module]\nsource = \"luet_pm_core.py\"\n").unwrap();
        let module = manifest.core_module.unwrap();
        assert_eq!(module.interpreter, "python3");
        assert!(module.python_version.is_none());
    }

    #[test]
    fn invalid_mode_in_manifest_is_rejected() {
        let err = toml::from_str::<Manifest>(
            "[[files]]\nsource = \"a\"\ndestination = \"/a\"\nmode = \"999\"\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid file mode"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = toml::from_str::<Manifest>(
            "[[files]]\nsource = \"a\"\ndestination = \"/a\"\nmode = \"644\"\nowner_id = 0\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn load_reads_manifest_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("install.toml");
        std::fs::write(
            &path,
            "[[files]]\nsource = \"app.py\"\ndestination = \"/usr/bin/app.py\"\nmode = \"755\"\n",
        )
        .unwrap();
        let manifest = load(&path).unwrap();
        assert_eq!(manifest.files.len(), 1);
        assert_eq!(manifest.files[0].mode.bits(), 0o755);
        assert!(manifest.locale.is_none());
        assert!(manifest.core_module.is_none());
    }
}
