//! `luet-pm-install` command-line entry point.
use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

use luet_pm_installer::cli::{Cli, Command};
use luet_pm_installer::commands;
use luet_pm_installer::logging::{self, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let command = args.subcommand();

    if command == Command::Version {
        commands::version::run();
        return Ok(());
    }

    logging::init_subscriber(args.verbose, command.name());
    let log = Arc::new(Logger::new(command.name()));

    match command {
        Command::Install => commands::install::run(&args.global, &log),
        Command::Uninstall => commands::uninstall::run(&args.global, &log),
        Command::Verify => commands::verify::run(&args.global, &log),
        Command::Version => Ok(()),
    }
}
