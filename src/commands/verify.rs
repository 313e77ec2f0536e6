//! Verify command implementation.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::logging::Logger;
use crate::tasks;

/// Run the verify command.
///
/// Verification never writes, so `--dry-run` has no effect here.
///
/// # Errors
///
/// Returns an error if configuration loading fails or any resource is
/// missing, differs, or cannot be checked.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    let runner = super::CommandRunner::new(global, log)?;
    let tasks = tasks::all_verify_tasks();
    runner.run(tasks.iter().map(Box::as_ref))?;
    log.info("all resources installed correctly");
    Ok(())
}
