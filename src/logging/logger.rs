//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::summary::{Tally, TaskEntry, TaskStatus};
use super::utils::log_file_path;

/// Sink for task output.
///
/// Tasks log through this trait rather than [`Logger`] so tests can hand
/// them any implementation.
pub trait Log: Send + Sync {
    /// Section header, e.g. `Install files`.
    fn stage(&self, msg: &str);
    /// Progress message.
    fn info(&self, msg: &str);
    /// Detail shown only with `--verbose`; always written to the log file.
    fn debug(&self, msg: &str);
    /// Recoverable problem.
    fn warn(&self, msg: &str);
    /// Failure of a task.
    fn error(&self, msg: &str);
    /// Change that would be made without `--dry-run`.
    fn dry_run(&self, msg: &str);
    /// Remember a task's outcome for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Tracing target for stage headers.
pub(super) const STAGE_TARGET: &str = "luet_pm_installer::stage";
/// Tracing target for dry-run previews.
pub(super) const DRY_RUN_TARGET: &str = "luet_pm_installer::dry_run";

/// Structured logger with dry-run awareness and summary collection.
///
/// Every message is also written to
/// `$XDG_CACHE_HOME/luet-pm-installer/<command>.log` by the file layer that
/// [`init_subscriber`](super::subscriber::init_subscriber) installs.
#[derive(Debug)]
pub struct Logger {
    tasks: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger for `command`.
    ///
    /// Only remembers the log file path for the summary; the file itself is
    /// created by the subscriber.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    /// Create a logger that reports `log_file` in its summary.
    #[must_use]
    pub const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded task entries.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a task result for the summary.
    pub fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Number of tasks recorded as [`TaskStatus::Failed`].
    #[must_use]
    pub fn failure_count(&self) -> u32 {
        self.tasks
            .lock()
            .map_or(0, |guard| Tally::of(&guard).count(TaskStatus::Failed))
    }

    /// Print one line per recorded task, then the totals and the log path.
    pub fn print_summary(&self) {
        let tasks = self.task_entries();
        if tasks.is_empty() {
            return;
        }

        self.stage("Summary");
        for task in &tasks {
            self.info(&task.line());
        }
        self.info(&Tally::of(&tasks).line());

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.record_task(name, status, message);
    }
}
