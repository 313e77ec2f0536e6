//! TOML manifest parsing.
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::ConfigError;

/// Read and deserialize a TOML file.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::InvalidManifest`] if it does not match `T`.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(path, &content)
}

/// Deserialize TOML `content`, attributing parse errors to `path`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidManifest`] if `content` does not match `T`.
pub fn parse_config<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::InvalidManifest {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })
}
