//! Owner and group resolution for installed files.
//!
//! Names resolve through the system user and group databases (NSS), so
//! users from LDAP or sssd work as well as local ones. Purely numeric
//! values are taken as ids without a lookup.
use std::path::Path;

use super::error::ResourceError;

/// Numeric ownership to apply; `None` leaves that id unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ownership {
    /// User id.
    pub uid: Option<u32>,
    /// Group id.
    pub gid: Option<u32>,
}

impl Ownership {
    /// Resolve optional user and group names.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::OwnershipChangeFailed`] for `target` if a name
    /// is unknown or the lookup itself fails.
    #[cfg(unix)]
    pub fn resolve(
        owner: Option<&str>,
        group: Option<&str>,
        target: &Path,
    ) -> Result<Self, ResourceError> {
        use nix::unistd::{Group, User};

        let failed = |reason: String| ResourceError::OwnershipChangeFailed {
            path: target.to_path_buf(),
            reason,
        };

        let uid = match owner {
            None => None,
            Some(name) => Some(match name.parse::<u32>() {
                Ok(id) => id,
                Err(_) => User::from_name(name)
                    .map_err(|e| failed(format!("looking up user '{name}': {e}")))?
                    .ok_or_else(|| failed(format!("unknown user '{name}'")))?
                    .uid
                    .as_raw(),
            }),
        };
        let gid = match group {
            None => None,
            Some(name) => Some(match name.parse::<u32>() {
                Ok(id) => id,
                Err(_) => Group::from_name(name)
                    .map_err(|e| failed(format!("looking up group '{name}': {e}")))?
                    .ok_or_else(|| failed(format!("unknown group '{name}'")))?
                    .gid
                    .as_raw(),
            }),
        };

        Ok(Self { uid, gid })
    }

    /// Only numeric ids can be resolved on this platform.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::OwnershipChangeFailed`] for any name.
    #[cfg(not(unix))]
    pub fn resolve(
        owner: Option<&str>,
        group: Option<&str>,
        target: &Path,
    ) -> Result<Self, ResourceError> {
        let numeric = |value: Option<&str>| {
            value
                .map(|v| {
                    v.parse::<u32>()
                        .map_err(|_| ResourceError::OwnershipChangeFailed {
                            path: target.to_path_buf(),
                            reason: format!("cannot resolve '{v}' on this platform"),
                        })
                })
                .transpose()
        };
        Ok(Self {
            uid: numeric(owner)?,
            gid: numeric(group)?,
        })
    }

    /// Whether this ownership changes anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.uid.is_none() && self.gid.is_none()
    }

    /// Whether the file at `path` already has this ownership.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be inspected.
    #[cfg(unix)]
    pub fn matches(&self, path: &Path) -> std::io::Result<bool> {
        use std::os::unix::fs::MetadataExt;
        let meta = std::fs::metadata(path)?;
        Ok(self.uid.is_none_or(|uid| uid == meta.uid())
            && self.gid.is_none_or(|gid| gid == meta.gid()))
    }

    /// Ownership is not tracked on this platform.
    ///
    /// # Errors
    ///
    /// Never fails.
    #[cfg(not(unix))]
    pub fn matches(&self, _path: &Path) -> std::io::Result<bool> {
        Ok(true)
    }

    /// Apply this ownership to `path`.
    ///
    /// `chown` clears setuid and setgid bits, so permissions must be set
    /// after this call.
    ///
    /// # Errors
    ///
    /// `EPERM` is reported as [`ResourceError::PermissionDenied`]; other
    /// failures as [`ResourceError::OwnershipChangeFailed`].
    #[cfg(unix)]
    pub fn apply(&self, path: &Path) -> Result<(), ResourceError> {
        use nix::errno::Errno;
        use nix::unistd::{Gid, Uid, chown};

        if self.is_empty() {
            return Ok(());
        }
        chown(
            path,
            self.uid.map(Uid::from_raw),
            self.gid.map(Gid::from_raw),
        )
        .map_err(|errno| match errno {
            Errno::EPERM | Errno::EACCES => ResourceError::PermissionDenied {
                path: path.to_path_buf(),
            },
            other => ResourceError::OwnershipChangeFailed {
                path: path.to_path_buf(),
                reason: other.desc().to_string(),
            },
        })
    }

    /// Ownership cannot be changed on this platform.
    ///
    /// # Errors
    ///
    /// Always returns [`ResourceError::OwnershipChangeFailed`] unless empty.
    #[cfg(not(unix))]
    pub fn apply(&self, path: &Path) -> Result<(), ResourceError> {
        if self.is_empty() {
            return Ok(());
        }
        Err(ResourceError::OwnershipChangeFailed {
            path: path.to_path_buf(),
            reason: "ownership is not supported on this platform".to_string(),
        })
    }
}
