//! Command-line interface definitions.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI entry point for the Luet package manager GUI installer.
#[derive(Parser, Debug)]
#[command(
    name = "luet-pm-install",
    about = "Install the Luet package manager GUI into the filesystem",
    version
)]
pub struct Cli {
    /// Subcommand to run; `install` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

impl Cli {
    /// The subcommand to run, defaulting to `install`.
    #[must_use]
    pub const fn subcommand(&self) -> Command {
        match self.command {
            Some(command) => command,
            None => Command::Install,
        }
    }
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Directory holding the files to install
    #[arg(long, global = true, env = "LUET_PM_SOURCE_ROOT")]
    pub source_root: Option<PathBuf>,

    /// Prefix for every destination path
    #[arg(long, global = true, env = "DESTDIR")]
    pub dest_root: Option<PathBuf>,

    /// Manifest describing what to install (TOML)
    #[arg(long, global = true)]
    pub manifest: Option<PathBuf>,

    /// Keep going after a failed step (still exits non-zero)
    #[arg(long, global = true)]
    pub best_effort: bool,

    /// Interpreter version for the site-packages path, e.g. 3.11
    #[arg(long, global = true, value_name = "X.Y")]
    pub python_version: Option<String>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Install files, translations and the core module (default)
    Install,
    /// Remove installed files that still match their source
    Uninstall,
    /// Check that everything is installed and up to date
    Verify,
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the log file.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Uninstall => "uninstall",
            Self::Verify => "verify",
            Self::Version => "version",
        }
    }
}
