//! Location of the interpreter's `site-packages` directory.
use std::fmt;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Environment variable holding the library directory suffix (e.g. `64`).
pub const LIB_SUFFIX_VAR: &str = "LIB_SUFFIX";

/// Interpreter `MAJOR.MINOR` version.
///
/// # Examples
///
/// ```
/// use luet_pm_installer::config::site_packages::PythonVersion;
///
/// let v = PythonVersion::parse("3.12.1").unwrap();
/// assert_eq!(v.to_string(), "3.12");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PythonVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
}

impl PythonVersion {
    /// Parse `X.Y` (a trailing `.Z` patch component is ignored).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPythonVersion`] if the major or minor
    /// component is missing or not numeric.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidPythonVersion(s.trim().to_string());
        let mut parts = s.trim().split('.');
        let major = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        let minor = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        Ok(Self { major, minor })
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// `/usr/lib<suffix>/python<X.Y>/site-packages`.
#[must_use]
pub fn site_packages_dir(lib_suffix: &str, version: PythonVersion) -> PathBuf {
    PathBuf::from(format!("/usr/lib{lib_suffix}"))
        .join(format!("python{version}"))
        .join("site-packages")
}

/// Read the library suffix from the environment (empty when unset).
#[must_use]
pub fn lib_suffix_from_env() -> String {
    std::env::var(LIB_SUFFIX_VAR).unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_major_minor() {
        let v = PythonVersion::parse("3.11").unwrap();
        assert_eq!(v, PythonVersion { major: 3, minor: 11 });
    }

    #[test]
    fn parse_ignores_patch_and_whitespace() {
        let v = PythonVersion::parse(" 3.12.4\n").unwrap();
        assert_eq!(v.to_string(), "3.12");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(PythonVersion::parse("3").is_err());
        assert!(PythonVersion::parse("three.eleven").is_err());
        assert!(PythonVersion::parse("").is_err());
    }

    #[test]
    fn site_packages_without_suffix() {
        let dir = site_packages_dir("", PythonVersion { major: 3, minor: 12 });
        assert_eq!(dir, PathBuf::from("/usr/lib/python3.12/site-packages"));
    }

    #[test]
    fn site_packages_with_suffix() {
        let dir = site_packages_dir("64", PythonVersion { major: 3, minor: 11 });
        assert_eq!(dir, PathBuf::from("/usr/lib64/python3.11/site-packages"));
    }
}
