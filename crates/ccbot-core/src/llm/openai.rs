use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{http_client, ChatMessage, Generator};
use crate::error::{Error, Result};

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct ChatRespChoice {
    message: ChatRespMessage,
}

#[derive(Debug, Deserialize)]
struct ChatRespMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResp {
    choices: Vec<ChatRespChoice>,
}

impl OpenAiGenerator {
    pub fn new(
        api_key: String,
        model: impl Into<String>,
        max_tokens: u32,
        api_base: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let base = api_base.unwrap_or(DEFAULT_API_BASE).trim_end_matches('/');
        Ok(Self {
            client: http_client(timeout)?,
            api_key,
            model: model.into(),
            max_tokens,
            api_url: format!("{}/chat/completions", base),
        })
    }
}

impl Generator for OpenAiGenerator {
    fn generate(&self, messages: &[ChatMessage]) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": self.max_tokens,
        });
        debug!("chat completion with {} ({} messages)", self.model, messages.len());

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| Error::GenerationService(format!("failed to call OpenAI: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let txt = resp.text().unwrap_or_default();
            return Err(Error::GenerationService(format!(
                "OpenAI error {}: {}",
                status, txt
            )));
        }

        let parsed: ChatResp = resp
            .json()
            .map_err(|e| Error::GenerationService(format!("invalid response from OpenAI: {}", e)))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::GenerationService("OpenAI returned no content".to_string()))
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
