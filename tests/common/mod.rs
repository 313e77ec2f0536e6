// Shared helpers for integration tests.
//
// Provides a temporary source tree and destination root plus a fluent
// builder, so each integration test can stage an isolated installation
// without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use luet_pm_installer::cli::GlobalOpts;
use luet_pm_installer::logging::Logger;

/// Manifest used by most tests: two files, translations and a core module
/// with a pinned interpreter version so no `python3` is needed.
pub const STANDARD_MANIFEST: &str = r#"
[[files]]
source = "luet_pm_gui.py"
destination = "/usr/bin/luet_pm_gui.py"
mode = "755"

[[files]]
source = "luet_pm_gui.desktop"
destination = "/usr/share/applications/luet_pm_gui.desktop"
mode = "644"

[locale]
source = "locale"
destination = "/usr/share/locale"
domain = "luet_pm_ui"

[core_module]
source = "luet_pm_core.py"
python_version = "3.11"
"#;

/// Installed launcher path relative to the destination root.
pub const LAUNCHER: &str = "usr/bin/luet_pm_gui.py";
/// Installed desktop entry path relative to the destination root.
pub const DESKTOP: &str = "usr/share/applications/luet_pm_gui.desktop";
/// Installed core module path relative to the destination root.
pub const CORE_MODULE: &str = "usr/lib/python3.11/site-packages/luet_pm_core.py";

/// Installed translation path for `language`, relative to the destination root.
pub fn translation(language: &str) -> PathBuf {
    PathBuf::from(format!(
        "usr/share/locale/{language}/LC_MESSAGES/luet_pm_ui.mo"
    ))
}

/// A source tree and an empty destination root, both deleted on drop.
pub struct InstallFixture {
    /// Directory holding the files to install and `install.toml`.
    pub source: tempfile::TempDir,
    /// Destination prefix every manifest destination is placed under.
    pub dest: tempfile::TempDir,
}

impl InstallFixture {
    /// Path to the source root.
    pub fn source_path(&self) -> &Path {
        self.source.path()
    }

    /// Path of `relative` under the destination root.
    pub fn dest_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.dest.path().join(relative)
    }

    /// Read an installed file.
    pub fn read_dest(&self, relative: impl AsRef<Path>) -> String {
        std::fs::read_to_string(self.dest_path(relative)).expect("read installed file")
    }

    /// Strict, non-dry-run options pointing at this fixture.
    pub fn global(&self) -> GlobalOpts {
        GlobalOpts {
            source_root: Some(self.source.path().to_path_buf()),
            dest_root: Some(self.dest.path().to_path_buf()),
            ..GlobalOpts::default()
        }
    }

    /// Whether the destination root contains anything.
    pub fn dest_is_empty(&self) -> bool {
        std::fs::read_dir(self.dest.path())
            .expect("list dest root")
            .next()
            .is_none()
    }
}

/// A logger that records tasks without writing a log file.
pub fn logger() -> Arc<Logger> {
    Arc::new(Logger::with_log_file(None))
}

/// Fluent builder for [`InstallFixture`].
pub struct FixtureBuilder {
    fixture: InstallFixture,
}

impl FixtureBuilder {
    /// Begin with an empty source tree containing only `manifest`.
    pub fn with_manifest(manifest: &str) -> Self {
        let fixture = InstallFixture {
            source: tempfile::tempdir().expect("create source dir"),
            dest: tempfile::tempdir().expect("create dest dir"),
        };
        std::fs::write(fixture.source.path().join("install.toml"), manifest)
            .expect("write install.toml");
        Self { fixture }
    }

    /// Begin with [`STANDARD_MANIFEST`] and every source it names, with a
    /// `fr` translation and a `de` directory lacking one.
    pub fn standard() -> Self {
        Self::with_manifest(STANDARD_MANIFEST)
            .file("luet_pm_gui.py", "#!/usr/bin/env python3\nprint('gui')\n")
            .file("luet_pm_gui.desktop", "[Desktop Entry]\nName=Luet\n")
            .file("luet_pm_core.py", "CORE = True\n")
            .translation("fr", "fr-catalog")
            .dir("locale/de")
    }

    /// Write `content` to `relative` in the source tree.
    pub fn file(self, relative: &str, content: &str) -> Self {
        let path = self.fixture.source.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create source parent");
        }
        std::fs::write(&path, content).expect("write source file");
        self
    }

    /// Create an empty directory in the source tree.
    pub fn dir(self, relative: &str) -> Self {
        std::fs::create_dir_all(self.fixture.source.path().join(relative))
            .expect("create source dir");
        self
    }

    /// Add a compiled catalogue for `language`.
    pub fn translation(self, language: &str, content: &str) -> Self {
        self.file(
            &format!("locale/{language}/LC_MESSAGES/luet_pm_ui.mo"),
            content,
        )
    }

    /// Remove a source file written earlier.
    pub fn without(self, relative: &str) -> Self {
        std::fs::remove_file(self.fixture.source.path().join(relative))
            .expect("remove source file");
        self
    }

    /// Finish building and return the fixture.
    pub fn build(self) -> InstallFixture {
        self.fixture
    }
}
