//! Task placing the core module in the interpreter's `site-packages`.
use anyhow::{Context as _, Result};

use super::{Action, Context, Task, TaskResult, run_action};
use crate::config::manifest::CoreModuleSpec;
use crate::config::site_packages::{PythonVersion, site_packages_dir};
use crate::resources::installed_file::InstalledFileResource;

/// Script printing the interpreter's `MAJOR.MINOR` version.
const VERSION_QUERY: &str = "import sys; print('%d.%d' % sys.version_info[:2])";

/// Interpreter version used for the `site-packages` path.
///
/// The command-line override wins, then the manifest's `python_version`;
/// otherwise the interpreter is asked.
///
/// # Errors
///
/// Returns an error if the interpreter is not on `PATH`, exits non-zero,
/// or prints something other than a version.
pub fn python_version(ctx: &Context, spec: &CoreModuleSpec) -> Result<PythonVersion> {
    if let Some(version) = ctx.config.python_version {
        return Ok(version);
    }
    if let Some(version) = &spec.python_version {
        return Ok(PythonVersion::parse(version)?);
    }

    let interpreter = ctx
        .executor
        .which(&spec.interpreter)
        .with_context(|| format!("'{}' not found on PATH", spec.interpreter))?;
    let program = interpreter.to_string_lossy();
    let output = ctx
        .executor
        .run(&program, &["-c".to_string(), VERSION_QUERY.to_string()])
        .with_context(|| format!("querying {} version", spec.interpreter))?;
    let version = PythonVersion::parse(&output.stdout)?;
    ctx.log
        .debug(&format!("{} reports version {version}", spec.interpreter));
    Ok(version)
}

/// The core module placed in the interpreter's `site-packages` directory.
///
/// # Errors
///
/// Returns an error if the interpreter version cannot be determined or the
/// source has no file name.
pub fn resource(ctx: &Context, spec: &CoreModuleSpec) -> Result<InstalledFileResource> {
    let file_name = spec.source.file_name().with_context(|| {
        format!(
            "core module source has no file name: {}",
            spec.source.display()
        )
    })?;
    let version = python_version(ctx, spec)?;
    let destination = site_packages_dir(&ctx.config.lib_suffix, version).join(file_name);
    Ok(InstalledFileResource::new(
        ctx.config.source_path(&spec.source),
        ctx.destination(&destination),
        spec.mode,
    ))
}

/// Install, remove, or verify the core Python module.
#[derive(Debug)]
pub struct CoreModule(pub Action);

impl Task for CoreModule {
    fn name(&self) -> &'static str {
        match self.0 {
            Action::Install => "Install core module",
            Action::Uninstall => "Remove core module",
            Action::Verify => "Verify core module",
        }
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.config.manifest.core_module.is_some()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let Some(spec) = &ctx.config.manifest.core_module else {
            return Ok(TaskResult::Skipped("no core_module section".to_string()));
        };
        run_action(ctx, self.0, [resource(ctx, spec)?])
    }
}
