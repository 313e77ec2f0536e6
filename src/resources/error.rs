//! Typed error variants for resource operations.
//!
//! This module provides [`ResourceError`], a structured error type for
//! resource check and apply operations.  Internal resource code returns
//! these variants directly; callers convert to [`anyhow::Error`] via `?`
//! and can recover the variant with [`anyhow::Error::downcast_ref`].

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that arise from resource checks and apply operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The file to install does not exist.
    #[error("source file not found: {}", path.display())]
    MissingSourceFile {
        /// Missing source path.
        path: PathBuf,
    },

    /// The process lacks the rights to write a destination or change its owner.
    #[error("permission denied: {}", path.display())]
    PermissionDenied {
        /// Path for which permission was denied.
        path: PathBuf,
    },

    /// The destination directory could not be created.
    #[error("cannot create directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Owner or group could not be resolved or applied.
    #[error("cannot set ownership of {}: {reason}", path.display())]
    OwnershipChangeFailed {
        /// Path whose ownership could not be changed.
        path: PathBuf,
        /// Human-readable reason.
        reason: String,
    },

    /// Any other I/O failure while copying or setting permissions.
    #[error("cannot install {}: {source}", path.display())]
    CopyFailed {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl ResourceError {
    /// Classify an I/O error raised while writing `path`.
    ///
    /// `EACCES`/`EPERM` become [`ResourceError::PermissionDenied`]; anything
    /// else is a [`ResourceError::CopyFailed`].
    #[must_use]
    pub fn from_write(path: &Path, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::PermissionDenied {
            Self::PermissionDenied {
                path: path.to_path_buf(),
            }
        } else {
            Self::CopyFailed {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }
}
