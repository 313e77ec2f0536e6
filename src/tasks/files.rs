//! Task for the manifest's `[[files]]` entries.
use anyhow::Result;

use super::{Action, Context, Task, TaskResult, run_action};
use crate::resources::installed_file::InstalledFileResource;

/// The manifest's `[[files]]` entries as resources, in manifest order.
#[must_use]
pub fn resources(ctx: &Context) -> Vec<InstalledFileResource> {
    ctx.config
        .manifest
        .files
        .iter()
        .map(|entry| {
            InstalledFileResource::from_entry(
                entry,
                ctx.config.source_path(&entry.source),
                ctx.destination(&entry.destination),
            )
        })
        .collect()
}

/// Install, remove, or verify the launcher, desktop, icon and polkit files.
#[derive(Debug)]
pub struct Files(pub Action);

impl Task for Files {
    fn name(&self) -> &'static str {
        match self.0 {
            Action::Install => "Install files",
            Action::Uninstall => "Remove files",
            Action::Verify => "Verify files",
        }
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.manifest.files.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        run_action(ctx, self.0, resources(ctx))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::manifest::{FileMode, InstallEntry, Manifest};
    use crate::tasks::test_helpers::{config_with_manifest, empty_config, make_context};
    use std::path::{Path, PathBuf};

    fn entry(source: &str, destination: &str, mode: u32) -> InstallEntry {
        InstallEntry {
            source: PathBuf::from(source),
            destination: PathBuf::from(destination),
            mode: FileMode::from_bits(mode),
            owner: None,
            group: None,
        }
    }

    #[test]
    fn resources_follow_manifest_order_and_roots() {
        let manifest = Manifest {
            files: vec![
                entry("luet_pm_gui.py", "/usr/bin/luet_pm_gui.py", 0o755),
                entry("luet_pm_gui.desktop", "/usr/share/applications/luet_pm_gui.desktop", 0o644),
            ],
            locale: None,
            core_module: None,
        };
        let (ctx, _log) = make_context(config_with_manifest(
            Path::new("/src"),
            Path::new("/stage"),
            manifest,
        ));
        let resources = resources(&ctx);
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].source, PathBuf::from("/src/luet_pm_gui.py"));
        assert_eq!(
            resources[0].target,
            PathBuf::from("/stage/usr/bin/luet_pm_gui.py")
        );
        assert_eq!(resources[0].mode, FileMode::from_bits(0o755));
        assert_eq!(
            resources[1].target,
            PathBuf::from("/stage/usr/share/applications/luet_pm_gui.desktop")
        );
    }

    #[test]
    fn ownership_is_carried_over() {
        let mut rules = entry("99-luet.rules", "/etc/polkit-1/rules.d/99-luet.rules", 0o644);
        rules.owner = Some("root".to_string());
        rules.group = Some("root".to_string());
        let manifest = Manifest {
            files: vec![rules],
            locale: None,
            core_module: None,
        };
        let (ctx, _log) = make_context(config_with_manifest(
            Path::new("/src"),
            Path::new("/"),
            manifest,
        ));
        let resources = resources(&ctx);
        assert_eq!(resources[0].owner.as_deref(), Some("root"));
        assert_eq!(resources[0].group.as_deref(), Some("root"));
    }

    #[test]
    fn not_applicable_without_files() {
        let (ctx, _log) = make_context(empty_config(Path::new("/src"), Path::new("/")));
        assert!(!Files(Action::Install).should_run(&ctx));
    }

    #[test]
    fn names_follow_action() {
        assert_eq!(Files(Action::Install).name(), "Install files");
        assert_eq!(Files(Action::Uninstall).name(), "Remove files");
        assert_eq!(Files(Action::Verify).name(), "Verify files");
    }

    #[test]
    fn install_copies_into_dest_root() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("luet_pm_gui.sh"), "#!/bin/sh\n").unwrap();
        let manifest = Manifest {
            files: vec![entry("luet_pm_gui.sh", "/usr/bin/luet_pm_gui.sh", 0o755)],
            locale: None,
            core_module: None,
        };
        let (ctx, _log) = make_context(config_with_manifest(src.path(), dest.path(), manifest));

        Files(Action::Install).run(&ctx).unwrap();
        assert_eq!(
            std::fs::read_to_string(dest.path().join("usr/bin/luet_pm_gui.sh")).unwrap(),
            "#!/bin/sh\n"
        );
        Files(Action::Verify).run(&ctx).unwrap();
    }
}
