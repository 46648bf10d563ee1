//! LLM configuration

use serde::{Deserialize, Serialize};

use crate::validation::{validate_positive, validate_url};

/// Language model configuration for answer generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Generation backend
    #[serde(default)]
    pub backend: LlmBackend,

    /// Model name
    ///
    /// Defaults to "gpt-4o-mini" for OpenAI and "llama3.1" for Ollama.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Maximum tokens for LLM responses
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Optional API base URL override
    ///
    /// Use this to point to alternative OpenAI-compatible endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// HTTP client timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    Ollama,
    /// Offline stub that answers with its own prompt
    Echo,
}

impl LlmBackend {
    pub const NAMES: [&'static str; 3] = ["openai", "ollama", "echo"];

    pub fn parse(value: &str) -> crate::error::Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            "echo" => Ok(Self::Echo),
            _ => Err(crate::error::ConfigError::invalid_enum(
                "llm.backend",
                value,
                &Self::NAMES,
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
            Self::Echo => "echo",
        }
    }
}

impl LlmConfig {
    /// Configured model, or the backend's default
    pub fn model_name(&self) -> &str {
        match (&self.model, self.backend) {
            (Some(model), _) => model,
            (None, LlmBackend::OpenAi) => "gpt-4o-mini",
            (None, LlmBackend::Ollama) => "llama3.1",
            (None, LlmBackend::Echo) => "echo",
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: LlmBackend::default(),
            model: None,
            max_tokens: default_max_tokens(),
            api_base: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl crate::validation::Validate for LlmConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        if let Some(model) = &self.model {
            if model.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    field: "llm.model".to_string(),
                    message: "Model name cannot be empty".to_string(),
                });
            }
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationError {
                field: "llm.max_tokens".to_string(),
                message: "max_tokens must be > 0".to_string(),
            });
        }

        validate_url("llm.api_base", self.api_base.as_deref())?;
        validate_positive("llm.timeout_secs", self.timeout_secs as usize, 0)?;

        Ok(())
    }
}

fn default_max_tokens() -> u32 {
    512
}

fn default_timeout_secs() -> u64 {
    60
}
