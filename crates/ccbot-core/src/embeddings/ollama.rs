use reqwest::blocking::Client;
use std::time::Duration;

use super::{http_client, Embedder, EmbeddingTask};
use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:11434";

/// Local Ollama server, one request per text
pub struct OllamaEmbedder {
    client: Client,
    model: String,
    base_url: String,
}

impl OllamaEmbedder {
    pub fn new(
        model: impl Into<String>,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            model: model.into(),
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

impl Embedder for OllamaEmbedder {
    fn embed(&self, texts: &[String], _task: EmbeddingTask) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let mut out = Vec::with_capacity(texts.len());
        for t in texts {
            let resp = self
                .client
                .post(&url)
                .json(&serde_json::json!({
                    "model": self.model,
                    "prompt": t
                }))
                .send()
                .and_then(|r| r.error_for_status())
                .map_err(|e| Error::EmbeddingService(format!("failed to call Ollama: {}", e)))?;

            let json: serde_json::Value = resp
                .json()
                .map_err(|e| {
                    Error::EmbeddingService(format!("invalid response from Ollama: {}", e))
                })?;

            let Some(arr) = json.get("embedding").and_then(|v| v.as_array()) else {
                return Err(Error::EmbeddingService(format!(
                    "invalid response from Ollama: {}",
                    json
                )));
            };
            out.push(arr.iter().map(|v| v.as_f64().unwrap_or(0.0) as f32).collect());
        }
        Ok(out)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
