//! Configuration management for the Contra Costa knowledge bot
//!
//! This crate provides a validated, layered configuration system with support for:
//! - Multiple formats (YAML, TOML, JSON)
//! - Config validation with helpful error messages
//! - Config merging (file + environment + CLI)
//!
//! # Example
//!
//! ```no_run
//! use ccbot_config::Config;
//!
//! // Load from default location (.ccbot.{toml,yml,yaml,json})
//! let config = Config::load()?;
//!
//! let raw = &config.data.raw_file;
//! let top_k = config.retrieval.top_k;
//! # Ok::<(), ccbot_config::ConfigError>(())
//! ```

pub mod error;
pub mod loader;
pub mod types;
pub mod validation;

pub use error::{ConfigError, ErrorFormatter, Result};
pub use loader::ConfigBuilder;
pub use types::*;
pub use validation::Validate;

#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
