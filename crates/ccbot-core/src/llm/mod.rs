use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{Error, Result};

pub mod echo;
pub mod ollama;
pub mod openai;

pub use echo::EchoGenerator;
pub use ollama::OllamaGenerator;
pub use openai::OpenAiGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A chat-completion style language model
pub trait Generator: Send + Sync {
    fn generate(&self, messages: &[ChatMessage]) -> Result<String>;
    fn model_id(&self) -> &str;
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn generate(&self, messages: &[ChatMessage]) -> Result<String> {
        (**self).generate(messages)
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

impl<G: Generator + ?Sized> Generator for Arc<G> {
    fn generate(&self, messages: &[ChatMessage]) -> Result<String> {
        (**self).generate(messages)
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

pub(crate) fn http_client(timeout: std::time::Duration) -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::GenerationService(format!("failed to build HTTP client: {}", e)))
}
