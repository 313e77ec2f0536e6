//! Generic resource processing loop: check state, apply or remove, collect stats.
//!
//! Single-resource handling lives in [`apply`]; this module drives the loop
//! and owns the counters and options shared by every task.

mod apply;

use anyhow::Result;

use super::context::Context;
use crate::resources::{Resource, ResourceState};

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use luet_pm_installer::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let skipped = TaskResult::Skipped("no translations found".into());
/// let dry = TaskResult::DryRun;
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(skipped, TaskResult::Skipped(_)));
/// assert!(matches!(dry, TaskResult::DryRun));
/// ```
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task had nothing to do.
    Skipped(String),
    /// Task ran in dry-run mode.
    DryRun,
}

/// Counters for batch tasks that process many items.
///
/// # Examples
///
/// ```
/// use luet_pm_installer::tasks::TaskStats;
///
/// let mut stats = TaskStats::new();
/// stats.changed = 3;
/// stats.already_ok = 2;
///
/// assert_eq!(stats.summary(false), "3 changed, 2 already ok");
/// assert_eq!(stats.summary(true), "3 would change, 2 already ok");
/// ```
///
/// Skipped and failed items are only mentioned when present:
///
/// ```
/// use luet_pm_installer::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 1, already_ok: 2, skipped: 1, failed: 1 };
/// assert_eq!(stats.summary(false), "1 changed, 2 already ok, 1 skipped, 1 failed");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Number of items changed or applied.
    pub changed: u32,
    /// Number of items already in the correct state.
    pub already_ok: u32,
    /// Number of items deliberately left alone.
    pub skipped: u32,
    /// Number of items that could not be processed.
    pub failed: u32,
}

impl TaskStats {
    /// Create a new empty stats counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Format the summary string (e.g. "3 changed, 2 already ok, 1 failed").
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        let mut parts = vec![
            format!("{} {verb}", self.changed),
            format!("{} already ok", self.already_ok),
        ];
        if self.skipped > 0 {
            parts.push(format!("{} skipped", self.skipped));
        }
        if self.failed > 0 {
            parts.push(format!("{} failed", self.failed));
        }
        parts.join(", ")
    }

    /// Log the summary and return the appropriate `TaskResult`.
    ///
    /// # Errors
    ///
    /// Returns an error if any item failed, so that a best-effort run still
    /// marks the task as failed.
    pub fn finish(self, ctx: &Context) -> Result<TaskResult> {
        ctx.log.info(&self.summary(ctx.dry_run));
        if self.failed > 0 {
            anyhow::bail!("{} item(s) failed", self.failed);
        }
        Ok(if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        })
    }
}

impl std::ops::AddAssign for TaskStats {
    fn add_assign(&mut self, other: Self) {
        self.changed += other.changed;
        self.already_ok += other.already_ok;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Verb and failure policy for the resource loops.
///
/// # Examples
///
/// ```
/// use luet_pm_installer::tasks::ProcessOpts;
///
/// let opts = ProcessOpts::strict("install");
/// assert!(opts.bail_on_error);
/// assert!(!opts.no_bail().bail_on_error);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ProcessOpts<'a> {
    /// Verb for log messages (e.g., "install", "remove").
    pub verb: &'a str,
    /// Propagate the first error (bail). If `false`, warn and count as failed.
    pub bail_on_error: bool,
}

impl<'a> ProcessOpts<'a> {
    /// Stop at the first failing resource.
    #[must_use]
    pub const fn strict(verb: &'a str) -> Self {
        Self {
            verb,
            bail_on_error: true,
        }
    }

    /// Options for `verb` following the context's strictness.
    #[must_use]
    pub const fn for_context(verb: &'a str, ctx: &Context) -> Self {
        let opts = Self::strict(verb);
        if ctx.strict { opts } else { opts.no_bail() }
    }

    /// Warn on errors instead of bailing.
    #[must_use]
    pub const fn no_bail(mut self) -> Self {
        self.bail_on_error = false;
        self
    }
}

/// Process resources by checking each one's current state and applying as needed.
///
/// Resources are handled in order; with `bail_on_error` the first failure
/// stops the loop and later resources are not touched.
///
/// # Errors
///
/// Returns the first failure when `bail_on_error` is set; otherwise returns
/// an error after the loop if any resource failed.
pub fn process_resources<R: Resource>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
    opts: &ProcessOpts,
) -> Result<TaskResult> {
    let mut stats = TaskStats::new();
    for resource in resources {
        stats += match resource.current_state() {
            Ok(current) => apply::process_single(ctx, &resource, current, opts)?,
            Err(e) => apply::record_failure(ctx, &resource.description(), e, opts)?,
        };
    }
    stats.finish(ctx)
}

/// Process resources for removal.
///
/// Only resources whose [`Resource::removal_state`] is
/// [`ResourceState::Correct`] are removed.  Modified destinations are left
/// in place with a warning.
///
/// # Errors
///
/// Same policy as [`process_resources`].
pub fn process_resources_remove<R: Resource>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
    opts: &ProcessOpts,
) -> Result<TaskResult> {
    let mut stats = TaskStats::new();
    for resource in resources {
        stats += match resource.removal_state() {
            Ok(current) => apply::remove_single(ctx, &resource, &current, opts)?,
            Err(e) => apply::record_failure(ctx, &resource.description(), e, opts)?,
        };
    }
    stats.finish(ctx)
}

/// Report the state of each resource without changing anything.
///
/// Every resource is checked regardless of earlier results.
///
/// # Errors
///
/// Returns an error if any resource is missing, differs from its source, or
/// cannot be checked.
pub fn verify_resources<R: Resource>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
) -> Result<TaskResult> {
    let mut correct = 0u32;
    let mut failing = 0u32;
    for resource in resources {
        let desc = resource.description();
        match resource.current_state() {
            Ok(ResourceState::Correct) => {
                ctx.log.debug(&format!("ok: {desc}"));
                correct += 1;
            }
            Ok(ResourceState::Missing) => {
                ctx.log.warn(&format!("missing: {desc}"));
                failing += 1;
            }
            Ok(ResourceState::Incorrect { current }) => {
                ctx.log.warn(&format!("differs: {desc} ({current})"));
                failing += 1;
            }
            Ok(ResourceState::Invalid { reason }) => {
                ctx.log.warn(&format!("invalid: {desc} ({reason})"));
                failing += 1;
            }
            Err(e) => {
                ctx.log.warn(&format!("cannot check {desc}: {e:#}"));
                failing += 1;
            }
        }
    }
    ctx.log
        .info(&format!("{correct} correct, {failing} need attention"));
    if failing > 0 {
        anyhow::bail!("{failing} resource(s) not installed correctly");
    }
    Ok(TaskResult::Ok)
}
