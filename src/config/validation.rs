//! Manifest checks that warn about likely mistakes without failing the run.
use std::collections::HashSet;
use std::path::{Component, Path};

use super::manifest::{CoreModuleSpec, FileMode, InstallEntry, LocaleSpec};

/// Manifest source label used in warnings.
const MANIFEST: &str = "manifest";

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The manifest section (e.g., "files", "locale").
    pub source: String,
    /// The specific item that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a warning for `item` in `source`.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Trait for manifest validators.
///
/// Implementations check for values that will install but are probably
/// mistakes: relative destinations, sources escaping the source root,
/// world-writable modes, missing source files.
pub trait ConfigValidator {
    /// Validate against `source_root` and return any warnings found.
    fn validate(&self, source_root: &Path) -> Vec<ValidationWarning>;

    /// Return a human-readable name for this validator (e.g., "files").
    fn name(&self) -> &'static str;
}

/// Validator for `[[files]]` entries.
#[derive(Debug)]
pub struct FileEntryValidator<'a> {
    entries: &'a [InstallEntry],
}

impl<'a> FileEntryValidator<'a> {
    /// Validate `[[files]]` entries.
    #[must_use]
    pub const fn new(entries: &'a [InstallEntry]) -> Self {
        Self { entries }
    }
}

impl ConfigValidator for FileEntryValidator<'_> {
    fn validate(&self, source_root: &Path) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for entry in self.entries {
            let item = entry.source.display().to_string();
            warnings.extend(check_source(self.name(), &item, &entry.source, source_root));
            warnings.extend(check_mode(self.name(), &item, entry.mode));

            if !entry.destination.is_absolute() {
                warnings.push(ValidationWarning::new(
                    self.name(),
                    &item,
                    format!(
                        "destination should be absolute: {}",
                        entry.destination.display()
                    ),
                ));
            }

            if has_parent_dir(&entry.destination) {
                warnings.push(ValidationWarning::new(
                    self.name(),
                    &item,
                    format!(
                        "destination contains '..': {}",
                        entry.destination.display()
                    ),
                ));
            }

            if !seen.insert(entry.destination.clone()) {
                warnings.push(ValidationWarning::new(
                    self.name(),
                    &item,
                    format!(
                        "destination listed more than once: {}",
                        entry.destination.display()
                    ),
                ));
            }
        }

        warnings
    }

    fn name(&self) -> &'static str {
        "files"
    }
}

/// Validator for the `[locale]` section.
#[derive(Debug)]
pub struct LocaleValidator<'a> {
    locale: &'a LocaleSpec,
}

impl<'a> LocaleValidator<'a> {
    /// Validate the `[locale]` section.
    #[must_use]
    pub const fn new(locale: &'a LocaleSpec) -> Self {
        Self { locale }
    }
}

impl ConfigValidator for LocaleValidator<'_> {
    fn validate(&self, source_root: &Path) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let domain = &self.locale.domain;

        if domain.is_empty() || domain.contains('/') {
            warnings.push(ValidationWarning::new(
                self.name(),
                domain,
                "domain must be a plain file stem",
            ));
        }
        if !self.locale.destination.is_absolute() {
            warnings.push(ValidationWarning::new(
                self.name(),
                domain,
                "destination should be absolute",
            ));
        }
        if has_parent_dir(&self.locale.destination) {
            warnings.push(ValidationWarning::new(
                self.name(),
                domain,
                "destination contains '..'",
            ));
        }
        if escapes_root(&self.locale.source) {
            warnings.push(ValidationWarning::new(
                self.name(),
                domain,
                "locale root should be relative to the source root",
            ));
        } else if !source_root.join(&self.locale.source).is_dir() {
            // Not an error: no translations is a valid state.
            warnings.push(ValidationWarning::new(
                self.name(),
                domain,
                "locale root does not exist, no translations will be installed",
            ));
        }
        warnings.extend(check_mode(self.name(), domain, self.locale.mode));

        warnings
    }

    fn name(&self) -> &'static str {
        "locale"
    }
}

/// Validator for the `[core_module]` section.
#[derive(Debug)]
pub struct CoreModuleValidator<'a> {
    module: &'a CoreModuleSpec,
}

impl<'a> CoreModuleValidator<'a> {
    /// Validate the `[core_module]` section.
    #[must_use]
    pub const fn new(module: &'a CoreModuleSpec) -> Self {
        Self { module }
    }
}

impl ConfigValidator for CoreModuleValidator<'_> {
    fn validate(&self, source_root: &Path) -> Vec<ValidationWarning> {
        let item = self.module.source.display().to_string();
        let mut warnings = check_source(self.name(), &item, &self.module.source, source_root);
        warnings.extend(check_mode(self.name(), &item, self.module.mode));
        if self.module.source.file_name().is_none() {
            warnings.push(ValidationWarning::new(
                self.name(),
                &item,
                "source must name a file",
            ));
        }
        warnings
    }

    fn name(&self) -> &'static str {
        "core_module"
    }
}

/// Run every validator applicable to `manifest`.
#[must_use]
pub fn validate_manifest(
    manifest: &super::manifest::Manifest,
    source_root: &Path,
) -> Vec<ValidationWarning> {
    let mut validators: Vec<Box<dyn ConfigValidator + '_>> =
        vec![Box::new(FileEntryValidator::new(&manifest.files))];
    if let Some(locale) = &manifest.locale {
        validators.push(Box::new(LocaleValidator::new(locale)));
    }
    if let Some(module) = &manifest.core_module {
        validators.push(Box::new(CoreModuleValidator::new(module)));
    }

    validators
        .iter()
        .flat_map(|v| v.validate(source_root))
        .map(|mut w| {
            w.source = format!("{MANIFEST}.{}", w.source);
            w
        })
        .collect()
}

fn check_source(
    section: &str,
    item: &str,
    source: &Path,
    source_root: &Path,
) -> Vec<ValidationWarning> {
    if escapes_root(source) {
        return vec![ValidationWarning::new(
            section,
            item,
            "source path should be relative to the source root",
        )];
    }
    let path = source_root.join(source);
    if path.is_file() {
        Vec::new()
    } else {
        vec![ValidationWarning::new(
            section,
            item,
            format!("source file does not exist: {}", path.display()),
        )]
    }
}

fn check_mode(section: &str, item: &str, mode: FileMode) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    if mode.bits() & 0o002 != 0 {
        warnings.push(ValidationWarning::new(
            section,
            item,
            format!("mode {mode} is world-writable"),
        ));
    }
    if mode.bits() & 0o6000 != 0 {
        warnings.push(ValidationWarning::new(
            section,
            item,
            format!("mode {mode} sets setuid/setgid bits"),
        ));
    }
    warnings
}

fn has_parent_dir(path: &Path) -> bool {
    path.components().any(|c| c == Component::ParentDir)
}

fn escapes_root(path: &Path) -> bool {
    path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::manifest::Manifest;
    use std::path::PathBuf;

    fn entry(source: &str, destination: &str, mode: u32) -> InstallEntry {
        InstallEntry {
            source: PathBuf::from(source),
            destination: PathBuf::from(destination),
            mode: FileMode::from_bits(mode),
            owner: None,
            group: None,
        }
    }

    fn source_root_with(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for file in files {
            std::fs::write(dir.path().join(file), "x").unwrap();
        }
        dir
    }

    #[test]
    fn clean_entries_produce_no_warnings() {
        let root = source_root_with(&["app.py"]);
        let entries = [entry("app.py", "/usr/bin/app.py", 0o755)];
        assert!(FileEntryValidator::new(&entries)
            .validate(root.path())
            .is_empty());
    }

    #[test]
    fn missing_source_is_reported() {
        let root = source_root_with(&[]);
        let entries = [entry("app.py", "/usr/bin/app.py", 0o755)];
        let warnings = FileEntryValidator::new(&entries).validate(root.path());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("does not exist"));
    }

    #[test]
    fn escaping_source_is_reported() {
        let root = source_root_with(&[]);
        let entries = [entry("../secret", "/usr/bin/secret", 0o755)];
        let warnings = FileEntryValidator::new(&entries).validate(root.path());
        assert!(warnings[0].message.contains("relative to the source root"));
    }

    #[test]
    fn relative_destination_is_reported() {
        let root = source_root_with(&["app.py"]);
        let entries = [entry("app.py", "usr/bin/app.py", 0o755)];
        let warnings = FileEntryValidator::new(&entries).validate(root.path());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("absolute"));
    }

    #[test]
    fn duplicate_destination_is_reported() {
        let root = source_root_with(&["a", "b"]);
        let entries = [entry("a", "/usr/bin/x", 0o755), entry("b", "/usr/bin/x", 0o755)];
        let warnings = FileEntryValidator::new(&entries).validate(root.path());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].item, "b");
    }

    #[test]
    fn parent_dir_in_destination_is_reported() {
        let root = source_root_with(&["app.py"]);
        let entries = [entry("app.py", "/usr/bin/../../etc/app.py", 0o755)];
        let warnings = FileEntryValidator::new(&entries).validate(root.path());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("'..'"));
    }

    #[test]
    fn parent_dir_in_locale_destination_is_reported() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("locale")).unwrap();
        let locale = LocaleSpec {
            source: PathBuf::from("locale"),
            destination: PathBuf::from("/usr/share/../../locale"),
            domain: "luet_pm_ui".to_string(),
            mode: FileMode::from_bits(0o644),
        };
        let warnings = LocaleValidator::new(&locale).validate(root.path());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("'..'"));
    }

    #[test]
    fn world_writable_and_setuid_modes_are_reported() {
        let root = source_root_with(&["a"]);
        let entries = [entry("a", "/usr/bin/a", 0o4777)];
        let warnings = FileEntryValidator::new(&entries).validate(root.path());
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn missing_locale_root_is_reported() {
        let root = source_root_with(&[]);
        let locale = LocaleSpec {
            source: PathBuf::from("locale"),
            destination: PathBuf::from("/usr/share/locale"),
            domain: "luet_pm_ui".to_string(),
            mode: FileMode::from_bits(0o644),
        };
        let warnings = LocaleValidator::new(&locale).validate(root.path());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("locale root does not exist"));
    }

    #[test]
    fn bad_domain_is_reported() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("locale")).unwrap();
        let locale = LocaleSpec {
            source: PathBuf::from("locale"),
            destination: PathBuf::from("/usr/share/locale"),
            domain: "a/b".to_string(),
            mode: FileMode::from_bits(0o644),
        };
        let warnings = LocaleValidator::new(&locale).validate(root.path());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("plain file stem"));
    }

    #[test]
    fn validate_manifest_prefixes_section() {
        let root = source_root_with(&[]);
        let manifest = Manifest {
            files: vec![entry("app.py", "/usr/bin/app.py", 0o755)],
            locale: None,
            core_module: None,
        };
        let warnings = validate_manifest(&manifest, root.path());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].source, "manifest.files");
    }

    #[test]
    fn validate_builtin_manifest_against_complete_tree() {
        let root = source_root_with(&[
            "luet_pm_gui.png",
            "luet_pm_gui.desktop",
            "luet_pm_gui.py",
            "luet_pm_gui.sh",
            "org.mocaccino.luet-pm-gui.policy",
            "99-luet.rules",
            "luet_pm_core.py",
        ]);
        std::fs::create_dir(root.path().join("locale")).unwrap();
        let manifest = Manifest::builtin().unwrap();
        let warnings = validate_manifest(&manifest, root.path());
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }
}
