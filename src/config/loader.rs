use std::fs;
use std::path::Path;

use crate::config::types::Config;
use crate::errors::ConfigError;

/// Load config from a JSON file.
///
/// Only syntax is checked here; field-level requiredness is validated later,
/// at acquisition time.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
