//! Installable units and their on-disk state.
//!
//! A [`Resource`] is one destination path the installer owns. Tasks ask
//! each resource for its state, then install or remove it only when the
//! state calls for it, so running the installer twice changes nothing.
pub mod error;
pub mod helpers;
pub mod installed_file;
pub mod ownership;

use anyhow::Result;

/// How a destination compares with what the manifest asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Nothing at the destination.
    Missing,
    /// Destination content, mode and ownership all match.
    Correct,
    /// Destination exists but differs.
    Incorrect {
        /// What differs, e.g. `content differs` or `mode 600`.
        current: String,
    },
    /// Destination can never be installed as requested.
    Invalid {
        /// Why, e.g. the destination is a directory.
        reason: String,
    },
}

/// A destination path the installer can inspect, install and remove.
pub trait Resource {
    /// One-line label used in log output.
    fn description(&self) -> String;

    /// Compare the destination against the desired content, mode and owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is missing or either side cannot be
    /// read.
    fn current_state(&self) -> Result<ResourceState>;

    /// State used to decide whether uninstall may delete the destination.
    ///
    /// Only [`ResourceState::Correct`] destinations are removed. Defaults to
    /// [`Resource::current_state`].
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined.
    fn removal_state(&self) -> Result<ResourceState> {
        self.current_state()
    }

    /// Write the destination so that it matches.
    ///
    /// # Errors
    ///
    /// Returns a [`error::ResourceError`] describing the failed step.
    fn apply(&self) -> Result<()>;

    /// Delete the destination.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination exists but cannot be removed.
    fn remove(&self) -> Result<()>;
}

impl<T: Resource + ?Sized> Resource for &T {
    fn description(&self) -> String {
        (**self).description()
    }

    fn current_state(&self) -> Result<ResourceState> {
        (**self).current_state()
    }

    fn removal_state(&self) -> Result<ResourceState> {
        (**self).removal_state()
    }

    fn apply(&self) -> Result<()> {
        (**self).apply()
    }

    fn remove(&self) -> Result<()> {
        (**self).remove()
    }
}
