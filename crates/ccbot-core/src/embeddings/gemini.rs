use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{http_client, Embedder, EmbeddingTask};
use crate::error::{Error, Result};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google `batchEmbedContents`; the task type is passed through
pub struct GeminiEmbedder {
    client: Client,
    api_key: String,
    model: String,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct BatchResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

impl GeminiEmbedder {
    pub fn new(
        api_key: String,
        model: impl Into<String>,
        api_base: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let model: String = model.into();
        let model = model.trim_start_matches("models/").to_string();
        let base = api_base.unwrap_or(DEFAULT_API_BASE).trim_end_matches('/');
        Ok(Self {
            client: http_client(timeout)?,
            api_key,
            api_url: format!("{}/models/{}:batchEmbedContents", base, model),
            model,
        })
    }
}

impl Embedder for GeminiEmbedder {
    fn embed(&self, texts: &[String], task: EmbeddingTask) -> Result<Vec<Vec<f32>>> {
        let model_path = format!("models/{}", self.model);
        let requests: Vec<serde_json::Value> = texts
            .iter()
            .map(|t| {
                json!({
                    "model": model_path,
                    "content": { "parts": [{ "text": t }] },
                    "taskType": task.as_str()
                })
            })
            .collect();

        let resp = self
            .client
            .post(&self.api_url)
            .header("x-goog-api-key", &self.api_key)
            .json(&json!({ "requests": requests }))
            .send()
            .map_err(|e| Error::EmbeddingService(format!("failed to call Gemini: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let txt = resp.text().unwrap_or_default();
            return Err(Error::EmbeddingService(format!(
                "Gemini error {}: {}",
                status, txt
            )));
        }

        let parsed: BatchResponse = resp
            .json()
            .map_err(|e| Error::EmbeddingService(format!("invalid response from Gemini: {}", e)))?;
        Ok(parsed.embeddings.into_iter().map(|e| e.values).collect())
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
