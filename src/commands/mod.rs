//! Top-level subcommand orchestration.
pub mod install;
pub mod uninstall;
pub mod verify;
pub mod version;

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::config::MANIFEST_FILE;
use crate::config::site_packages::PythonVersion;
use crate::error::TaskError;
use crate::exec::SystemExecutor;
use crate::logging::{Log, Logger, TaskStatus};
use crate::tasks::{self, Context, Task};

/// A file whose presence marks a directory as a source root.
const ROOT_MARKERS: [&str; 2] = ["luet_pm_gui.py", MANIFEST_FILE];

/// Whether `dir` looks like a source root.
fn is_source_root(dir: &Path) -> bool {
    ROOT_MARKERS.iter().any(|marker| dir.join(marker).is_file())
}

/// First candidate directory that looks like a source root.
fn find_source_root<I>(candidates: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    candidates.into_iter().find(|dir| is_source_root(dir))
}

/// Resolve the directory holding the files to install.
///
/// An explicit root (`--source-root` or `LUET_PM_SOURCE_ROOT`) wins. Otherwise
/// the executable's directory, its parent, then the current directory are
/// tried, in that order.
///
/// # Errors
///
/// Returns an error if no candidate contains the launcher or a manifest, or
/// the chosen root cannot be canonicalized.
pub fn resolve_source_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(root) = explicit {
        return dunce::canonicalize(root)
            .with_context(|| format!("source root {} is not accessible", root.display()));
    }

    let mut candidates = Vec::new();
    if let Ok(exe) = std::env::current_exe()
        && let Some(dir) = exe.parent()
    {
        candidates.push(dir.to_path_buf());
        if let Some(parent) = dir.parent() {
            candidates.push(parent.to_path_buf());
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd);
    }

    let root = find_source_root(candidates).context(
        "cannot determine source root. Use --source-root or set LUET_PM_SOURCE_ROOT",
    )?;
    Ok(dunce::canonicalize(&root)?)
}

/// Resolve the destination prefix (`--dest-root` or `DESTDIR`), defaulting to `/`.
#[must_use]
pub fn resolve_dest_root(explicit: Option<&Path>) -> PathBuf {
    explicit
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("/"), Path::to_path_buf)
}

/// Shared state produced by the common command setup sequence.
#[derive(Debug)]
pub struct CommandSetup {
    /// Loaded configuration with command-line overrides applied.
    pub config: Config,
}

impl CommandSetup {
    /// Resolve the roots, load the manifest, and log validation warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if the source root cannot be determined, the manifest
    /// fails to parse, or `--python-version` is malformed.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        log.stage("Loading configuration");
        let source_root = resolve_source_root(global.source_root.as_deref())?;
        let dest_root = resolve_dest_root(global.dest_root.as_deref());
        log.info(&format!("source root: {}", source_root.display()));
        log.info(&format!("destination root: {}", dest_root.display()));

        let mut config = Config::load(&source_root, &dest_root, global.manifest.as_deref())?;
        config.python_version = global
            .python_version
            .as_deref()
            .map(PythonVersion::parse)
            .transpose()?;

        log.info(&format!("manifest: {}", config.manifest_origin));
        log.debug(&format!("{} files", config.manifest.files.len()));
        if let Some(locale) = &config.manifest.locale {
            log.debug(&format!("locale domain: {}", locale.domain));
        }
        if !config.lib_suffix.is_empty() {
            log.debug(&format!("LIB_SUFFIX={}", config.lib_suffix));
        }

        let warnings = config.validate();
        if !warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                warnings.len()
            ));
            for warning in &warnings {
                log.warn(&format!(
                    "  {} [{}]: {}",
                    warning.source, warning.item, warning.message
                ));
            }
        }

        Ok(Self { config })
    }
}

/// Loads configuration once and runs a command's tasks against it.
#[derive(Debug)]
pub struct CommandRunner {
    ctx: Context,
    log: Arc<Logger>,
}

impl CommandRunner {
    /// Perform the shared setup and build the execution context.
    ///
    /// # Errors
    ///
    /// Returns an error if [`CommandSetup::init`] fails.
    pub fn new(global: &GlobalOpts, log: &Arc<Logger>) -> Result<Self> {
        let setup = CommandSetup::init(global, log)?;
        let ctx = Context::new(
            Arc::new(setup.config),
            Arc::clone(log) as Arc<dyn Log>,
            global.dry_run,
            !global.best_effort,
            Arc::new(SystemExecutor),
        );
        Ok(Self {
            ctx,
            log: Arc::clone(log),
        })
    }

    /// Run `tasks` in order. See [`run_tasks`].
    ///
    /// # Errors
    ///
    /// Returns an error if any task failed.
    pub fn run<'a>(&self, tasks: impl IntoIterator<Item = &'a dyn Task>) -> Result<()> {
        run_tasks(tasks, &self.ctx, &self.log)
    }
}

/// Execute tasks in order and print the summary.
///
/// In strict mode the first failing task stops the run; the tasks after it
/// are recorded as not run. With `--best-effort` every task runs and the
/// failures are counted.
///
/// # Errors
///
/// Returns [`TaskError::Aborted`] or [`TaskError::Failed`] if a task failed.
pub fn run_tasks<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    let queue: Vec<&dyn Task> = tasks.into_iter().collect();
    for (i, task) in queue.iter().enumerate() {
        let status = tasks::execute(*task, ctx);
        if status == TaskStatus::Failed && ctx.strict {
            for rest in queue.iter().skip(i + 1) {
                log.record_task(rest.name(), TaskStatus::Aborted, None);
            }
            log.print_summary();
            return Err(TaskError::Aborted {
                task: task.name().to_string(),
            }
            .into());
        }
    }

    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        return Err(TaskError::Failed(count).into());
    }
    Ok(())
}
