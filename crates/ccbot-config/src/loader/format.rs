//! Config document formats

use crate::{error::ConfigError, Config, Result};
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

impl ConfigFormat {
    /// Format implied by the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yml" | "yaml") => Ok(Self::Yaml),
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnknownFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Deserialize a document. `origin` names the file in error messages.
    pub fn parse(self, content: &str, origin: Option<&str>) -> Result<Config> {
        match self {
            Self::Yaml => serde_yaml::from_str(content)
                .map_err(|e| ConfigError::from_yaml_error(e, content, origin)),
            Self::Toml => ::toml::from_str(content)
                .map_err(|e| ConfigError::from_toml_error(e, content, origin)),
            Self::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::from_json_error(e, content, origin)),
        }
    }

    /// Deserialize a document as written, without filling in defaults.
    /// Call [`ConfigFormat::parse`] first for typed error messages.
    pub fn parse_layer(self, content: &str, origin: Option<&str>) -> Result<Value> {
        match self {
            Self::Yaml => serde_yaml::from_str(content)
                .map_err(|e| ConfigError::from_yaml_error(e, content, origin)),
            Self::Toml => ::toml::from_str(content)
                .map_err(|e| ConfigError::from_toml_error(e, content, origin)),
            Self::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::from_json_error(e, content, origin)),
        }
    }
}
