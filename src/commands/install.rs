//! Install command implementation.
use anyhow::Result;
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::logging::Logger;
use crate::tasks;

/// Line printed once every install step succeeded.
pub const SUCCESS_MESSAGE: &str = "installation complete";

/// Run the install command.
///
/// # Errors
///
/// Returns an error if configuration loading fails or any task fails.
pub fn run(global: &GlobalOpts, log: &Arc<Logger>) -> Result<()> {
    log.info(&format!("luet-pm-installer {}", super::version::version()));
    let runner = super::CommandRunner::new(global, log)?;
    let tasks = tasks::all_install_tasks();
    runner.run(tasks.iter().map(Box::as_ref))?;
    if global.dry_run {
        log.info("dry run complete, nothing was changed");
    } else {
        log.info(SUCCESS_MESSAGE);
    }
    Ok(())
}
