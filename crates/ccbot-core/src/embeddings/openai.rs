use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{http_client, Embedder, EmbeddingTask};
use crate::error::{Error, Result};

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI `/embeddings`, one batched request per call
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    model: String,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiEmbedder {
    pub fn new(
        api_key: String,
        model: impl Into<String>,
        api_base: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let base = api_base.unwrap_or(DEFAULT_API_BASE).trim_end_matches('/');
        Ok(Self {
            client: http_client(timeout)?,
            api_key,
            model: model.into(),
            api_url: format!("{}/embeddings", base),
        })
    }
}

impl Embedder for OpenAiEmbedder {
    fn embed(&self, texts: &[String], _task: EmbeddingTask) -> Result<Vec<Vec<f32>>> {
        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "input": texts,
                "model": self.model
            }))
            .send()
            .map_err(|e| Error::EmbeddingService(format!("failed to call OpenAI: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let txt = resp.text().unwrap_or_default();
            return Err(Error::EmbeddingService(format!(
                "OpenAI error {}: {}",
                status, txt
            )));
        }

        let mut parsed: EmbeddingResponse = resp
            .json()
            .map_err(|e| Error::EmbeddingService(format!("invalid response from OpenAI: {}", e)))?;
        parsed.data.sort_by_key(|item| item.index);
        Ok(parsed.data.into_iter().map(|item| item.embedding).collect())
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
