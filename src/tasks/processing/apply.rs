//! Single-resource processing: check state, apply or remove one resource.

use anyhow::Result;

use super::super::context::Context;
use super::{ProcessOpts, TaskStats};
use crate::resources::{Resource, ResourceState};

/// Process a single resource given its current state, returning a stats delta.
pub(super) fn process_single<R: Resource>(
    ctx: &Context,
    resource: &R,
    resource_state: ResourceState,
    opts: &ProcessOpts,
) -> Result<TaskStats> {
    let desc = resource.description();
    let mut delta = TaskStats::new();
    match resource_state {
        ResourceState::Correct => {
            ctx.log.debug(&format!("ok: {desc}"));
            delta.already_ok += 1;
        }
        ResourceState::Invalid { reason } => {
            return record_failure(ctx, &desc, anyhow::anyhow!(reason), opts);
        }
        ResourceState::Incorrect { current } if ctx.dry_run => {
            ctx.log
                .dry_run(&format!("would {} {desc} (currently {current})", opts.verb));
            delta.changed += 1;
        }
        ResourceState::Missing if ctx.dry_run => {
            ctx.log.dry_run(&format!("would {}: {desc}", opts.verb));
            delta.changed += 1;
        }
        ResourceState::Missing | ResourceState::Incorrect { .. } => {
            if let Err(e) = resource.apply() {
                return record_failure(ctx, &desc, e, opts);
            }
            ctx.log.debug(&format!("{}: {desc}", opts.verb));
            delta.changed += 1;
        }
    }
    Ok(delta)
}

/// Remove a single resource, returning a stats delta.
pub(super) fn remove_single<R: Resource>(
    ctx: &Context,
    resource: &R,
    current: &ResourceState,
    opts: &ProcessOpts,
) -> Result<TaskStats> {
    let desc = resource.description();
    let mut delta = TaskStats::new();
    match current {
        ResourceState::Correct => {
            if ctx.dry_run {
                ctx.log.dry_run(&format!("would {}: {desc}", opts.verb));
                delta.changed += 1;
                return Ok(delta);
            }
            if let Err(e) = resource.remove() {
                return record_failure(ctx, &desc, e, opts);
            }
            ctx.log.debug(&format!("{}: {desc}", opts.verb));
            delta.changed += 1;
        }
        ResourceState::Incorrect { current } => {
            ctx.log.warn(&format!("left in place: {desc} ({current})"));
            delta.skipped += 1;
        }
        ResourceState::Invalid { reason } => {
            ctx.log.debug(&format!("skipping {desc}: {reason}"));
            delta.skipped += 1;
        }
        ResourceState::Missing => {
            ctx.log.debug(&format!("not installed: {desc}"));
            delta.already_ok += 1;
        }
    }
    Ok(delta)
}

/// Handle a failed resource according to `opts.bail_on_error`.
///
/// Strict: the error is returned with the resource as context.  Otherwise
/// it is logged as a warning and counted as failed.
pub(super) fn record_failure(
    ctx: &Context,
    desc: &str,
    err: anyhow::Error,
    opts: &ProcessOpts,
) -> Result<TaskStats> {
    if opts.bail_on_error {
        return Err(err.context(format!("failed to {} {desc}", opts.verb)));
    }
    ctx.log
        .warn(&format!("failed to {} {desc}: {err:#}", opts.verb));
    Ok(TaskStats {
        failed: 1,
        ..TaskStats::default()
    })
}
