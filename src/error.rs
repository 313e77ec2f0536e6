//! Domain-specific error types for the installer.
//!
//! Internal modules return typed errors ([`ConfigError`], [`TaskError`],
//! [`ResourceError`](crate::resources::error::ResourceError)) while command
//! handlers at the CLI boundary convert them to [`anyhow::Error`] via `?`.
//!
//! # Error hierarchy
//!
//! ```text
//! ConfigError   : manifest parsing, file modes, root resolution
//! TaskError     : aborted runs and failed task summaries
//! ResourceError : copy, permission, ownership and directory failures
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise from manifest loading and option resolution.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A permission mode is not a 3 or 4 digit octal number.
    #[error("invalid file mode '{0}': expected 3 or 4 octal digits (e.g. 644, 0755)")]
    InvalidMode(String),

    /// The manifest file exists but is not valid TOML for the manifest schema.
    #[error("invalid manifest {path}: {message}")]
    InvalidManifest {
        /// Path to the manifest that failed to parse.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// A python version string is not of the form `X.Y`.
    #[error("invalid python version '{0}': expected MAJOR.MINOR (e.g. 3.12)")]
    InvalidPythonVersion(String),

    /// An I/O error occurred while reading a configuration file.
    #[error("IO error reading {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise from running tasks.
#[derive(Error, Debug)]
pub enum TaskError {
    /// A task failed in strict mode and the remaining tasks were not run.
    #[error("'{task}' failed, aborting remaining steps")]
    Aborted {
        /// Name of the failing task.
        task: String,
    },

    /// One or more tasks failed in best-effort mode.
    #[error("{0} task(s) failed")]
    Failed(u32),
}
