//! Named, ordered tasks that orchestrate resource changes.
pub mod context;
pub mod core_module;
pub mod files;
mod processing;
pub mod translations;

pub use context::Context;
pub use processing::{
    ProcessOpts, TaskResult, TaskStats, process_resources, process_resources_remove,
    verify_resources,
};

use anyhow::Result;

use crate::logging::TaskStatus;
use crate::resources::Resource;

/// What a task does with its resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Copy missing or outdated resources into place.
    Install,
    /// Remove resources that still match their source.
    Uninstall,
    /// Report resources that are missing or differ.
    Verify,
}

impl Action {
    /// Verb used in per-resource log messages.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Uninstall => "remove",
            Self::Verify => "verify",
        }
    }
}

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task applies to the loaded manifest.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails: a source is missing, a
    /// destination cannot be written, or the interpreter cannot be queried.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// Dispatch `resources` to the processing loop matching `action`.
///
/// # Errors
///
/// Propagates the processing loop's errors.
pub fn run_action<R: Resource>(
    ctx: &Context,
    action: Action,
    resources: impl IntoIterator<Item = R>,
) -> Result<TaskResult> {
    let opts = ProcessOpts::for_context(action.verb(), ctx);
    match action {
        Action::Install => process_resources(ctx, resources, &opts),
        Action::Uninstall => process_resources_remove(ctx, resources, &opts),
        Action::Verify => verify_resources(ctx, resources),
    }
}

/// The tasks for `action`, in execution order.
#[must_use]
pub fn tasks_for(action: Action) -> Vec<Box<dyn Task>> {
    vec![
        Box::new(files::Files(action)),
        Box::new(translations::Translations(action)),
        Box::new(core_module::CoreModule(action)),
    ]
}

/// The complete set of tasks run by the install command.
#[must_use]
pub fn all_install_tasks() -> Vec<Box<dyn Task>> {
    tasks_for(Action::Install)
}

/// The complete set of tasks run by the uninstall command.
#[must_use]
pub fn all_uninstall_tasks() -> Vec<Box<dyn Task>> {
    tasks_for(Action::Uninstall)
}

/// The complete set of tasks run by the verify command.
#[must_use]
pub fn all_verify_tasks() -> Vec<Box<dyn Task>> {
    tasks_for(Action::Verify)
}

/// Execute a task, recording the result in the logger.
///
/// Returns the recorded status.
pub fn execute(task: &dyn Task, ctx: &Context) -> TaskStatus {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return TaskStatus::NotApplicable;
    }

    ctx.log.stage(task.name());

    let (status, message) = match task.run(ctx) {
        Ok(TaskResult::Ok) => (TaskStatus::Ok, None),
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            (TaskStatus::Skipped, Some(reason))
        }
        Ok(TaskResult::DryRun) => (TaskStatus::DryRun, None),
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            (TaskStatus::Failed, Some(format!("{e:#}")))
        }
    };
    ctx.log.record_task(task.name(), status, message.as_deref());
    status
}
