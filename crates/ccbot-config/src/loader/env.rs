//! Environment variable configuration overlay
//!
//! Supports environment variables in the format:
//! `CCBOT_<section>_<field>=value`
//!
//! Examples:
//! - `CCBOT_RETRIEVAL_PROFILE=legacy`
//! - `CCBOT_RETRIEVAL_TOP_K=8`
//! - `CCBOT_EMBEDDING_BACKEND=gemini`

use crate::{error::ConfigError, types::*, Config, Result};
use std::env;
use std::path::PathBuf;
use tracing::warn;

const PREFIX: &str = "CCBOT_";

/// Apply every `CCBOT_` variable onto `config`, touching only the fields
/// they name. Returns how many were applied; bad ones are logged and skipped.
pub fn apply_env(config: &mut Config) -> usize {
    let mut applied = 0;
    for (key, value) in env::vars().filter(|(k, _)| k.starts_with(PREFIX)) {
        match apply_env_var(config, &key, &value) {
            Ok(()) => applied += 1,
            Err(e) => warn!("ignoring {}: {}", key, e),
        }
    }
    applied
}

/// Apply a single environment variable to config
fn apply_env_var(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let key = key.strip_prefix(PREFIX).unwrap_or(key);

    let Some((section, field)) = key.split_once('_') else {
        return Err(ConfigError::EnvVarError {
            var: key.to_string(),
            message: "Expected format: CCBOT_<section>_<field>".to_string(),
        });
    };

    let section = section.to_lowercase();
    let field = field.to_lowercase();

    match section.as_str() {
        "data" => apply_data_var(&mut config.data, &field, value),
        "chunking" => apply_chunking_var(&mut config.chunking, &field, value),
        "embedding" => apply_embedding_var(&mut config.embedding, &field, value),
        "llm" => apply_llm_var(&mut config.llm, &field, value),
        "retrieval" => apply_retrieval_var(&mut config.retrieval, &field, value),
        "server" => apply_server_var(&mut config.server, &field, value),
        _ => Err(ConfigError::EnvVarError {
            var: key.to_string(),
            message: format!("Unknown section: {}", section),
        }),
    }
}

fn unknown_field(section: &str, field: &str) -> ConfigError {
    ConfigError::EnvVarError {
        var: format!("{}{}_{}", PREFIX, section, field.to_uppercase()),
        message: format!("Unknown field: {}", field),
    }
}

fn parse_number<T: std::str::FromStr>(section: &str, field: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| ConfigError::EnvVarError {
        var: format!("{}{}_{}", PREFIX, section, field.to_uppercase()),
        message: format!("Invalid integer: {}", value),
    })
}

fn apply_data_var(config: &mut DataConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "raw_file" => config.raw_file = PathBuf::from(value),
        "processed_dir" => config.processed_dir = PathBuf::from(value),
        "index_dir" => config.index_dir = PathBuf::from(value),
        _ => return Err(unknown_field("DATA", field)),
    }
    Ok(())
}

fn apply_chunking_var(config: &mut ChunkingConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "week_end" => {
            let candidate = ChunkingConfig {
                week_end: value.trim().to_lowercase(),
            };
            candidate.week_end_day()?;
            *config = candidate;
        }
        _ => return Err(unknown_field("CHUNKING", field)),
    }
    Ok(())
}

fn apply_embedding_var(config: &mut EmbeddingConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "backend" => config.backend = EmbeddingBackend::parse(value)?,
        "model_name" => config.model_name = Some(value.to_string()),
        "api_base" => config.api_base = Some(value.to_string()),
        "dimensions" => config.dimensions = parse_number("EMBEDDING", field, value)?,
        "timeout_secs" => config.timeout_secs = parse_number("EMBEDDING", field, value)?,
        _ => return Err(unknown_field("EMBEDDING", field)),
    }
    Ok(())
}

fn apply_llm_var(config: &mut LlmConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "backend" => config.backend = LlmBackend::parse(value)?,
        "model" => config.model = Some(value.to_string()),
        "max_tokens" => config.max_tokens = parse_number("LLM", field, value)?,
        "api_base" => config.api_base = Some(value.to_string()),
        "timeout_secs" => config.timeout_secs = parse_number("LLM", field, value)?,
        _ => return Err(unknown_field("LLM", field)),
    }
    Ok(())
}

fn apply_retrieval_var(config: &mut RetrievalConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "profile" => config.profile = ProfileName::parse(value)?,
        "top_k" => config.top_k = Some(parse_number("RETRIEVAL", field, value)?),
        "granularity" => config.granularity = Granularity::parse(value)?,
        "system_prompt" => config.system_prompt = Some(value.to_string()),
        _ => return Err(unknown_field("RETRIEVAL", field)),
    }
    Ok(())
}

fn apply_server_var(config: &mut ServerConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "bind" => config.bind = value.trim().to_string(),
        _ => return Err(unknown_field("SERVER", field)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ENV_LOCK;

    fn cleanup_ccbot_env_vars() {
        let keys: Vec<String> = env::vars()
            .map(|(k, _)| k)
            .filter(|k| k.starts_with(PREFIX))
            .collect();
        for key in keys {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_retrieval_env() {
        let _lock = ENV_LOCK.lock().unwrap();
        cleanup_ccbot_env_vars();
        env::set_var("CCBOT_RETRIEVAL_PROFILE", "legacy");
        env::set_var("CCBOT_RETRIEVAL_TOP_K", "9");
        let mut config = Config::default();
        assert_eq!(apply_env(&mut config), 2);
        assert_eq!(config.retrieval.profile, ProfileName::Legacy);
        assert_eq!(config.retrieval.top_k, Some(9));
        cleanup_ccbot_env_vars();
    }

    #[test]
    fn test_multi_word_field() {
        let _lock = ENV_LOCK.lock().unwrap();
        cleanup_ccbot_env_vars();
        env::set_var("CCBOT_EMBEDDING_MODEL_NAME", "text-embedding-3-large");
        env::set_var("CCBOT_DATA_INDEX_DIR", "/tmp/idx");
        let mut config = Config::default();
        apply_env(&mut config);
        assert_eq!(
            config.embedding.model_name.as_deref(),
            Some("text-embedding-3-large")
        );
        assert_eq!(config.data.index_dir, PathBuf::from("/tmp/idx"));
        cleanup_ccbot_env_vars();
    }

    #[test]
    fn test_bad_values_are_skipped() {
        let _lock = ENV_LOCK.lock().unwrap();
        cleanup_ccbot_env_vars();
        env::set_var("CCBOT_LLM_BACKEND", "gpt");
        env::set_var("CCBOT_LLM_MAX_TOKENS", "lots");
        let mut config = Config::default();
        assert_eq!(apply_env(&mut config), 0);
        assert_eq!(config.llm, LlmConfig::default());
        cleanup_ccbot_env_vars();
    }

    #[test]
    fn test_unknown_section_rejected() {
        let mut config = Config::default();
        assert!(apply_env_var(&mut config, "CCBOT_GRAPH_DEPTH", "3").is_err());
        assert!(apply_env_var(&mut config, "CCBOT_SERVER", "x").is_err());
    }

    #[test]
    fn test_no_env_vars() {
        let _lock = ENV_LOCK.lock().unwrap();
        cleanup_ccbot_env_vars();
        let mut config = Config::default();
        config.server.bind = "0.0.0.0:1".to_string();
        assert_eq!(apply_env(&mut config), 0);
        assert_eq!(config.server.bind, "0.0.0.0:1");
    }

    #[test]
    fn test_env_can_restore_a_default() {
        let _lock = ENV_LOCK.lock().unwrap();
        cleanup_ccbot_env_vars();
        env::set_var("CCBOT_RETRIEVAL_GRANULARITY", "daily");
        let mut config = Config::default();
        config.retrieval.granularity = Granularity::Weekly;
        config.retrieval.top_k = Some(4);
        apply_env(&mut config);
        cleanup_ccbot_env_vars();

        assert_eq!(config.retrieval.granularity, Granularity::Daily);
        assert_eq!(config.retrieval.top_k, Some(4));
    }
}
