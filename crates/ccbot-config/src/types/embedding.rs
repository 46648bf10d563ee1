//! Embedding provider configuration

use serde::{Deserialize, Serialize};

use crate::validation::{validate_positive, validate_url};

/// Embedding provider configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding backend to use
    #[serde(default)]
    pub backend: EmbeddingBackend,

    /// Model name for the selected backend
    ///
    /// Defaults per backend:
    /// - OpenAI: "text-embedding-3-small"
    /// - Gemini: "text-embedding-004"
    /// - Ollama: "nomic-embed-text"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,

    /// Optional API base URL override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Vector width for the hashing backend
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// HTTP client timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Embedding backend options
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// OpenAI API (requires OPENAI_API_KEY)
    #[default]
    #[serde(rename = "openai")]
    OpenAi,

    /// Google Generative Language API (requires GEMINI_API_KEY)
    Gemini,

    /// Local Ollama server
    Ollama,

    /// Offline feature hashing, no service needed
    Hashing,
}

impl EmbeddingBackend {
    pub const NAMES: [&'static str; 4] = ["openai", "gemini", "ollama", "hashing"];

    pub fn parse(value: &str) -> crate::error::Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            "hashing" => Ok(Self::Hashing),
            _ => Err(crate::error::ConfigError::invalid_enum(
                "embedding.backend",
                value,
                &Self::NAMES,
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
            Self::Hashing => "hashing",
        }
    }

    fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "text-embedding-3-small",
            Self::Gemini => "text-embedding-004",
            Self::Ollama => "nomic-embed-text",
            Self::Hashing => "hashing-v1",
        }
    }
}

impl EmbeddingConfig {
    /// Configured model, or the backend's default
    pub fn model(&self) -> &str {
        self.model_name
            .as_deref()
            .unwrap_or_else(|| self.backend.default_model())
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::default(),
            model_name: None,
            api_base: None,
            dimensions: default_dimensions(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl crate::validation::Validate for EmbeddingConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        if let Some(model) = &self.model_name {
            if model.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    field: "embedding.model_name".to_string(),
                    message: "Model name cannot be empty".to_string(),
                });
            }
        }

        validate_url("embedding.api_base", self.api_base.as_deref())?;
        validate_positive("embedding.dimensions", self.dimensions, 0)?;
        validate_positive("embedding.timeout_secs", self.timeout_secs as usize, 0)?;

        Ok(())
    }
}

fn default_dimensions() -> usize {
    256
}

fn default_timeout_secs() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        let config = EmbeddingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model(), "text-embedding-3-small");
    }

    #[test]
    fn test_model_follows_backend() {
        let config = EmbeddingConfig {
            backend: EmbeddingBackend::Gemini,
            ..Default::default()
        };
        assert_eq!(config.model(), "text-embedding-004");

        let config = EmbeddingConfig {
            backend: EmbeddingBackend::Gemini,
            model_name: Some("embedding-001".to_string()),
            ..Default::default()
        };
        assert_eq!(config.model(), "embedding-001");
    }

    #[test]
    fn test_empty_model_name_invalid() {
        let config = EmbeddingConfig {
            model_name: Some(String::new()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_dimensions_invalid() {
        let config = EmbeddingConfig {
            dimensions: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backend_serialization() {
        assert_eq!(
            serde_json::to_string(&EmbeddingBackend::OpenAi).unwrap(),
            "\"openai\""
        );
        assert_eq!(
            serde_json::to_string(&EmbeddingBackend::Hashing).unwrap(),
            "\"hashing\""
        );
        assert_eq!(EmbeddingBackend::parse("Gemini").unwrap(), EmbeddingBackend::Gemini);
    }
}
