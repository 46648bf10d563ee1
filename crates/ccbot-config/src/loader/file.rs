use crate::{error::ConfigError, loader::ConfigFormat, Result, Validate};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Read, parse and validate one config file, returning only the keys it sets
pub fn load_layer<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::IoError {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let origin = path.display().to_string();
    format.parse(&content, Some(&origin))?.validate()?;
    format.parse_layer(&content, Some(&origin))
}
