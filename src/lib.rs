//! Installer for the Luet package manager GUI.
//!
//! Copies the launcher, desktop entry, icon, polkit rule, compiled
//! translations and the core Python module into a filesystem tree,
//! idempotently, as described by a TOML manifest.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: load and validate the install manifest
//! - **[`resources`]**: idempotent `check + apply` primitives for installed files
//! - **[`tasks`]**: named, ordered units of work wired to resources
//! - **[`commands`]**: top-level subcommand orchestration (`install`, `uninstall`, `verify`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod locale;
pub mod logging;
pub mod operations;
pub mod resources;
pub mod tasks;
