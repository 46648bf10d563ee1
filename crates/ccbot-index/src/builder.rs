use ccbot_core::embeddings::{Embedder, EmbeddingClient, EmbeddingTask};
use ccbot_core::{Chunk, Error, Result};
use std::path::Path;
use tracing::{info, warn};

use crate::store::{IndexPaths, IndexStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Nothing to index; no artifacts were written
    Skipped,
    Built {
        paths: IndexPaths,
        count: usize,
        dim: usize,
    },
}

/// Embeds chunks in order and writes the index + sidecar pair
pub struct IndexBuilder<E> {
    client: EmbeddingClient<E>,
}

impl<E: Embedder> IndexBuilder<E> {
    pub fn new(embedder: E) -> Self {
        Self {
            client: EmbeddingClient::new(embedder),
        }
    }

    pub fn build<P: AsRef<Path>>(&self, chunks: &[Chunk], stem: P) -> Result<BuildOutcome> {
        let stem = stem.as_ref();

        if chunks.iter().all(|c| c.text.trim().is_empty()) {
            warn!(
                "no chunk text to index for {}, skipping build",
                stem.display()
            );
            return Ok(BuildOutcome::Skipped);
        }

        if let Some(position) = chunks.iter().position(|c| c.text.trim().is_empty()) {
            return Err(Error::EmptyChunkText { position });
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let batch = self.client.embed(&texts, EmbeddingTask::RetrievalDocument)?;

        if batch.len() != chunks.len() {
            return Err(Error::IndexAlignment(format!(
                "{} chunks but {} vectors",
                chunks.len(),
                batch.len()
            )));
        }
        if let Some((i, p)) = batch
            .positions
            .iter()
            .enumerate()
            .find(|(i, p)| *i != **p)
        {
            return Err(Error::IndexAlignment(format!(
                "vector {} belongs to chunk {}",
                i, p
            )));
        }

        let dim = batch.dim();
        let paths = IndexStore::save(stem, self.client.model_id(), chunks, batch.vectors)?;
        info!("indexed {} chunks into {}", chunks.len(), stem.display());

        Ok(BuildOutcome::Built {
            paths,
            count: chunks.len(),
            dim,
        })
    }
}
