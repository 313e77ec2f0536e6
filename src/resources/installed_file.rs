//! Installed file resource: a copy of a source file with fixed permission bits
//! and optional ownership.
use anyhow::Result;
use std::path::{Path, PathBuf};

use super::error::ResourceError;
use super::helpers::fs::{ensure_parent_dir, remove_existing, same_content};
use super::ownership::Ownership;
use super::{Resource, ResourceState};
use crate::config::manifest::{FileMode, InstallEntry};

/// A file copied from the source tree to its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledFileResource {
    /// File to copy.
    pub source: PathBuf,
    /// Destination path (already placed under the destination root).
    pub target: PathBuf,
    /// Permission bits for the destination.
    pub mode: FileMode,
    /// User name or id to own the destination.
    pub owner: Option<String>,
    /// Group name or id to own the destination.
    pub group: Option<String>,
}

impl InstalledFileResource {
    /// Create a resource without ownership.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf, mode: FileMode) -> Self {
        Self {
            source,
            target,
            mode,
            owner: None,
            group: None,
        }
    }

    /// Create from a manifest entry with already-resolved paths.
    #[must_use]
    pub fn from_entry(entry: &InstallEntry, source: PathBuf, target: PathBuf) -> Self {
        Self::new(source, target, entry.mode)
            .with_ownership(entry.owner.clone(), entry.group.clone())
    }

    /// Set the requested owner and group.
    #[must_use]
    pub fn with_ownership(mut self, owner: Option<String>, group: Option<String>) -> Self {
        self.owner = owner;
        self.group = group;
        self
    }

    fn ownership(&self) -> Result<Ownership, ResourceError> {
        Ownership::resolve(self.owner.as_deref(), self.group.as_deref(), &self.target)
    }

    fn check_source(&self) -> Result<(), ResourceError> {
        if self.source.is_file() {
            Ok(())
        } else {
            Err(ResourceError::MissingSourceFile {
                path: self.source.clone(),
            })
        }
    }

    /// Copy into a hidden sibling, fix mode and owner, then rename over the
    /// destination so a running launcher is never seen half-written.
    fn install(&self, ownership: Ownership) -> Result<(), ResourceError> {
        let name = self
            .target
            .file_name()
            .map_or_else(|| "file".into(), |n| n.to_string_lossy().into_owned());
        let tmp = self.target.with_file_name(format!(".{name}.luet-tmp"));

        let staged = std::fs::copy(&self.source, &tmp)
            .map(drop)
            .map_err(|e| ResourceError::from_write(&self.target, e))
            .and_then(|()| ownership.apply(&tmp).map_err(|e| retarget(e, &self.target)))
            .and_then(|()| set_mode(&tmp, self.mode))
            .and_then(|()| {
                std::fs::rename(&tmp, &self.target)
                    .map_err(|e| ResourceError::from_write(&self.target, e))
            });

        if staged.is_err() {
            let _ = std::fs::remove_file(&tmp);
        }
        staged
    }
}

impl Resource for InstalledFileResource {
    fn description(&self) -> String {
        let desc = format!("{} [{}]", self.target.display(), self.mode);
        if self.owner.is_none() && self.group.is_none() {
            return desc;
        }
        format!(
            "{desc} {}:{}",
            self.owner.as_deref().unwrap_or(""),
            self.group.as_deref().unwrap_or("")
        )
    }

    fn apply(&self) -> Result<()> {
        self.check_source()?;
        let ownership = self.ownership()?;
        ensure_parent_dir(&self.target)?;
        self.install(ownership)?;
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        remove_existing(&self.target)?;
        Ok(())
    }

    fn current_state(&self) -> Result<ResourceState> {
        self.check_source()?;
        let ownership = self.ownership()?;

        let Ok(meta) = self.target.symlink_metadata() else {
            return Ok(ResourceState::Missing);
        };
        if meta.is_dir() {
            return Ok(ResourceState::Invalid {
                reason: format!("destination is a directory: {}", self.target.display()),
            });
        }
        if meta.is_symlink() {
            return Ok(ResourceState::Incorrect {
                current: "destination is a symlink".to_string(),
            });
        }

        if !same_content(&self.source, &self.target)? {
            return Ok(ResourceState::Incorrect {
                current: "content differs".to_string(),
            });
        }
        let current_mode = current_mode(&self.target)?;
        if current_mode != self.mode {
            return Ok(ResourceState::Incorrect {
                current: format!("mode {current_mode}"),
            });
        }
        if !ownership.matches(&self.target)? {
            return Ok(ResourceState::Incorrect {
                current: "ownership differs".to_string(),
            });
        }
        Ok(ResourceState::Correct)
    }

    fn removal_state(&self) -> Result<ResourceState> {
        let Ok(meta) = self.target.symlink_metadata() else {
            return Ok(ResourceState::Missing);
        };
        if meta.is_dir() {
            return Ok(ResourceState::Invalid {
                reason: format!("destination is a directory: {}", self.target.display()),
            });
        }
        // Without the source there is nothing to compare against.
        if !self.source.is_file() || same_content(&self.source, &self.target)? {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: "modified since install".to_string(),
            })
        }
    }
}

/// Point an ownership error raised on the staging file at the real target.
fn retarget(err: ResourceError, target: &Path) -> ResourceError {
    match err {
        ResourceError::PermissionDenied { .. } => ResourceError::PermissionDenied {
            path: target.to_path_buf(),
        },
        ResourceError::OwnershipChangeFailed { reason, .. } => {
            ResourceError::OwnershipChangeFailed {
                path: target.to_path_buf(),
                reason,
            }
        }
        other => other,
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: FileMode) -> Result<(), ResourceError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode.bits()))
        .map_err(|e| ResourceError::from_write(path, e))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: FileMode) -> Result<(), ResourceError> {
    Ok(())
}

#[cfg(unix)]
fn current_mode(path: &Path) -> std::io::Result<FileMode> {
    use std::os::unix::fs::PermissionsExt;
    Ok(FileMode::from_bits(
        std::fs::metadata(path)?.permissions().mode(),
    ))
}

#[cfg(not(unix))]
fn current_mode(_path: &Path) -> std::io::Result<FileMode> {
    Ok(FileMode::from_bits(0o644))
}
