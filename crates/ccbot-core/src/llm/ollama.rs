use reqwest::blocking::Client;
use std::time::Duration;

use super::{http_client, ChatMessage, Generator};
use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";

pub struct OllamaGenerator {
    client: Client,
    model: String,
    max_tokens: u32,
    base_url: String,
}

impl OllamaGenerator {
    pub fn new(
        model: impl Into<String>,
        max_tokens: u32,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            model: model.into(),
            max_tokens,
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

impl Generator for OllamaGenerator {
    fn generate(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "stream": false,
            "options": { "num_predict": self.max_tokens }
        });
        let resp = self
            .client
            .post(url)
            .json(&body)
            .send()
            .map_err(|e| Error::GenerationService(format!("failed to call Ollama: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let txt = resp.text().unwrap_or_default();
            return Err(Error::GenerationService(format!(
                "Ollama error {}: {}",
                status, txt
            )));
        }

        let json: serde_json::Value = resp
            .json()
            .map_err(|e| Error::GenerationService(format!("invalid response from Ollama: {}", e)))?;
        json["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                Error::GenerationService(format!("invalid response from Ollama: {}", json))
            })
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
