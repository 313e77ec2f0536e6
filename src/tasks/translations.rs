//! Task for compiled translation catalogues.
use anyhow::Result;
use std::path::Path;

use super::{Action, Context, Task, TaskResult, run_action};
use crate::config::manifest::LocaleSpec;
use crate::locale;
use crate::resources::installed_file::InstalledFileResource;

/// Resources for every language under the locale root that ships the
/// artifact.
///
/// The locale root is listed lazily; each returned iterator reads a fresh
/// listing.
///
/// # Errors
///
/// Returns an error if the locale root exists but cannot be listed.
pub fn resources<'a>(
    ctx: &'a Context,
    spec: &'a LocaleSpec,
    artifact: &'a Path,
) -> Result<impl Iterator<Item = InstalledFileResource> + 'a> {
    let root = ctx.config.source_path(&spec.source);
    let entries = locale::discover(ctx.fs_ops.as_ref(), &root, artifact)?;
    Ok(entries.map(move |entry| {
        let target = ctx.destination(&entry.destination(&spec.destination, artifact));
        ctx.log
            .debug(&format!("found translation for '{}'", entry.language));
        InstalledFileResource::new(entry.translation_path, target, spec.mode)
    }))
}

/// Install, remove, or verify compiled translations.
#[derive(Debug)]
pub struct Translations(pub Action);

impl Task for Translations {
    fn name(&self) -> &'static str {
        match self.0 {
            Action::Install => "Install translations",
            Action::Uninstall => "Remove translations",
            Action::Verify => "Verify translations",
        }
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.config.manifest.locale.is_some()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let Some(spec) = &ctx.config.manifest.locale else {
            return Ok(TaskResult::Skipped("no locale section".to_string()));
        };
        let root = ctx.config.source_path(&spec.source);
        if !ctx.fs_ops.is_dir(&root) {
            ctx.log
                .debug(&format!("no locale directory at {}", root.display()));
        }
        let artifact = spec.artifact();
        run_action(ctx, self.0, resources(ctx, spec, &artifact)?)
    }
}
