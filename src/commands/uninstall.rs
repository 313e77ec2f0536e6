//! Uninstall command implementation.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::logging::Logger;
use crate::tasks;

/// Run the uninstall command.
///
/// # Errors
///
/// Returns an error if configuration loading fails or any task fails.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    let runner = super::CommandRunner::new(global, log)?;
    let tasks = tasks::all_uninstall_tasks();
    runner.run(tasks.iter().map(Box::as_ref))
}
