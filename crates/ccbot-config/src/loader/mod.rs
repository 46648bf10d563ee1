//! Configuration loading from various sources

pub mod env;
pub mod file;
pub mod format;
pub mod merge;

pub use format::ConfigFormat;

use crate::{Config, Result, Validate};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Default file names, searched in order
pub const DEFAULT_PATHS: [&str; 4] = [".ccbot.toml", ".ccbot.yml", ".ccbot.yaml", ".ccbot.json"];

/// Configuration source for layered loading
///
/// Every layer is partial: it replaces only the keys it sets.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    File(PathBuf),
    Environment,
    /// Explicit overrides, e.g. CLI flags, as a partial document
    Explicit(Value),
}

/// Builder for loading and merging configurations
///
/// Precedence: defaults < file < environment < explicit overrides
///
/// # Example
///
/// ```no_run
/// use ccbot_config::loader::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .with_file(".ccbot.toml")
///     .with_env()
///     .build()?;
/// # Ok::<(), ccbot_config::ConfigError>(())
/// ```
pub struct ConfigBuilder {
    sources: Vec<ConfigSource>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources
            .push(ConfigSource::File(path.as_ref().to_path_buf()));
        self
    }

    /// Use the first default file found in `dir`, if any
    pub fn with_default_file_in<P: AsRef<Path>>(self, dir: P) -> Self {
        let dir = dir.as_ref();
        match DEFAULT_PATHS
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
        {
            Some(path) => self.with_file(path),
            None => self,
        }
    }

    pub fn with_env(mut self) -> Self {
        self.sources.push(ConfigSource::Environment);
        self
    }

    /// Overrides shaped like a config document, e.g.
    /// `{"retrieval": {"top_k": 3}}`
    pub fn with_overrides(mut self, overrides: Value) -> Self {
        self.sources.push(ConfigSource::Explicit(overrides));
        self
    }

    /// Build and validate the final configuration
    ///
    /// Merges all sources in order, with later sources taking precedence.
    pub fn build(self) -> Result<Config> {
        let mut config = Config::default();

        for source in self.sources {
            match source {
                ConfigSource::File(path) => {
                    config = merge::apply_layer(&config, file::load_layer(&path)?)?;
                }
                ConfigSource::Environment => {
                    env::apply_env(&mut config);
                }
                ConfigSource::Explicit(overrides) => {
                    config = merge::apply_layer(&config, overrides)?;
                }
            }
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Load configuration from the first of [`DEFAULT_PATHS`] found in the
    /// working directory, falling back to defaults, then apply the env overlay.
    pub fn load() -> Result<Self> {
        ConfigBuilder::new()
            .with_default_file_in(".")
            .with_env()
            .build()
    }

    /// Load configuration from a specific file, then apply the env overlay
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        ConfigBuilder::new().with_file(path).with_env().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConfigError, Granularity, LlmBackend, ProfileName, ENV_LOCK};
    use pretty_assertions::assert_eq;
    use std::env;
    use std::fs;

    #[test]
    fn test_builder_default() {
        let config = ConfigBuilder::new().build().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let _lock = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".ccbot.yml");
        fs::write(
            &path,
            "retrieval:\n  profile: legacy\n  top_k: 4\n  granularity: weekly\n",
        )
        .unwrap();

        env::set_var("CCBOT_RETRIEVAL_TOP_K", "6");
        let config = ConfigBuilder::new().with_file(&path).with_env().build();
        env::remove_var("CCBOT_RETRIEVAL_TOP_K");

        let config = config.unwrap();
        assert_eq!(config.retrieval.profile, ProfileName::Legacy);
        assert_eq!(config.retrieval.granularity, Granularity::Weekly);
        assert_eq!(config.retrieval.top_k, Some(6));
    }

    #[test]
    fn test_explicit_overrides_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".ccbot.json");

        fs::write(&path, r#"{"server": {"bind": "0.0.0.0:9000"}, "llm": {"backend": "echo"}}"#)
            .unwrap();

        let config = ConfigBuilder::new()
            .with_file(&path)
            .with_overrides(serde_json::json!({ "server": { "bind": "127.0.0.1:9999" } }))
            .build()
            .unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:9999");
        assert_eq!(config.llm.backend, LlmBackend::Echo);
    }

    #[test]
    fn test_env_restores_default_over_file() {
        let _lock = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".ccbot.yml");
        fs::write(&path, "retrieval:\n  top_k: 4\n  granularity: weekly\n").unwrap();

        env::set_var("CCBOT_RETRIEVAL_GRANULARITY", "daily");
        let config = ConfigBuilder::new().with_file(&path).with_env().build();
        env::remove_var("CCBOT_RETRIEVAL_GRANULARITY");

        let config = config.unwrap();
        assert_eq!(config.retrieval.granularity, Granularity::Daily);
        assert_eq!(config.retrieval.top_k, Some(4));
    }

    #[test]
    fn test_later_file_restores_default() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.toml");
        let second = dir.path().join("second.toml");
        fs::write(&first, "[chunking]\nweek_end = \"saturday\"\n").unwrap();
        fs::write(&second, "[chunking]\nweek_end = \"sunday\"\n").unwrap();

        let config = ConfigBuilder::new()
            .with_file(&first)
            .with_file(&second)
            .build()
            .unwrap();
        assert_eq!(config.chunking.week_end, "sunday");
    }

    #[test]
    fn test_default_file_discovery() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".ccbot.toml"), "[chunking]\nweek_end = \"saturday\"\n").unwrap();
        let json = r#"{"chunking": {"week_end": "friday"}}"#;
        fs::write(dir.path().join(".ccbot.json"), json).unwrap();

        let config = ConfigBuilder::new()
            .with_default_file_in(dir.path())
            .build()
            .unwrap();
        assert_eq!(config.chunking.week_end, "saturday");
    }

    #[test]
    fn test_explicit_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigBuilder::new()
            .with_file(dir.path().join("nope.toml"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
