use std::sync::Arc;
use tracing::debug;

use crate::error::{Error, Result};

pub mod gemini;
pub mod hashing;
pub mod ollama;
pub mod openai;

pub use gemini::GeminiEmbedder;
pub use hashing::HashingEmbedder;
pub use ollama::OllamaEmbedder;
pub use openai::OpenAiEmbedder;

/// What the vectors will be used for; some providers embed differently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingTask {
    RetrievalDocument,
    RetrievalQuery,
}

impl EmbeddingTask {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingTask::RetrievalDocument => "RETRIEVAL_DOCUMENT",
            EmbeddingTask::RetrievalQuery => "RETRIEVAL_QUERY",
        }
    }
}

pub trait Embedder: Send + Sync {
    fn embed(&self, texts: &[String], task: EmbeddingTask) -> Result<Vec<Vec<f32>>>;
    fn model_id(&self) -> &str;
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn embed(&self, texts: &[String], task: EmbeddingTask) -> Result<Vec<Vec<f32>>> {
        (**self).embed(texts, task)
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

impl<E: Embedder + ?Sized> Embedder for Arc<E> {
    fn embed(&self, texts: &[String], task: EmbeddingTask) -> Result<Vec<Vec<f32>>> {
        (**self).embed(texts, task)
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

/// Vectors for the non-empty inputs of one request
///
/// `positions[i]` is the input index that produced `vectors[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddedBatch {
    pub positions: Vec<usize>,
    pub vectors: Vec<Vec<f32>>,
}

impl EmbeddedBatch {
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.vectors.first().map(Vec::len).unwrap_or(0)
    }
}

/// Wraps a provider with input filtering and response checks
pub struct EmbeddingClient<E> {
    embedder: E,
}

impl<E: Embedder> EmbeddingClient<E> {
    pub fn new(embedder: E) -> Self {
        Self { embedder }
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn model_id(&self) -> &str {
        self.embedder.model_id()
    }

    /// Embed the non-blank inputs in order.
    ///
    /// Inputs are trimmed and blank ones dropped before the provider is
    /// called. The provider must return one vector per request, all of the
    /// same non-zero width.
    pub fn embed(&self, texts: &[String], task: EmbeddingTask) -> Result<EmbeddedBatch> {
        let (positions, inputs): (Vec<usize>, Vec<String>) = texts
            .iter()
            .enumerate()
            .filter_map(|(i, t)| {
                let t = t.trim();
                (!t.is_empty()).then(|| (i, t.to_string()))
            })
            .unzip();

        if inputs.is_empty() {
            return Ok(EmbeddedBatch::default());
        }

        debug!(
            "embedding {} of {} texts with {} ({:?})",
            inputs.len(),
            texts.len(),
            self.embedder.model_id(),
            task
        );
        let vectors = self.embedder.embed(&inputs, task)?;

        if vectors.len() != inputs.len() {
            return Err(Error::EmbeddingService(format!(
                "requested {} embeddings, received {}",
                inputs.len(),
                vectors.len()
            )));
        }

        let dim = vectors[0].len();
        if dim == 0 {
            return Err(Error::EmbeddingService(
                "provider returned zero-length vectors".to_string(),
            ));
        }
        if let Some((i, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dim) {
            return Err(Error::EmbeddingService(format!(
                "vector {} has dimension {}, expected {}",
                i,
                v.len(),
                dim
            )));
        }

        Ok(EmbeddedBatch { positions, vectors })
    }

    /// Embed a single question for retrieval
    pub fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        let batch = self.embed(&[query.to_string()], EmbeddingTask::RetrievalQuery)?;
        batch.vectors.into_iter().next().ok_or(Error::EmptyQuery)
    }
}

/// Build the reqwest client shared by the HTTP providers
pub(crate) fn http_client(timeout: std::time::Duration) -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::EmbeddingService(format!("failed to build HTTP client: {}", e)))
}
