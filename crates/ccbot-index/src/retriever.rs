use ccbot_core::embeddings::{Embedder, EmbeddingClient};
use ccbot_core::{Chunk, Error, Result};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

use crate::store::IndexStore;

/// One retrieved chunk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Squared L2 distance to the query
    pub distance: f32,
    pub position: usize,
    pub chunk: Chunk,
}

/// Query-time view over a loaded index
pub struct Retriever<E> {
    store: IndexStore,
    client: EmbeddingClient<E>,
}

impl<E: Embedder> Retriever<E> {
    /// Load `<stem>.idx` + `<stem>.jsonl` once for the life of the retriever
    pub fn open<P: AsRef<Path>>(stem: P, embedder: E) -> Result<Self> {
        let store = IndexStore::load(stem)?;
        Ok(Self::from_store(store, embedder))
    }

    pub fn from_store(store: IndexStore, embedder: E) -> Self {
        if store.model() != embedder.model_id() {
            warn!(
                "index {} was built with '{}' but queries use '{}'",
                store.paths().index.display(),
                store.model(),
                embedder.model_id()
            );
        }
        Self {
            store,
            client: EmbeddingClient::new(embedder),
        }
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    /// The `k` nearest chunks to `query`, closest first
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        if query.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }
        if k == 0 || self.store.is_empty() {
            return Ok(Vec::new());
        }

        let vector = self.client.embed_query(query)?;
        if vector.len() != self.store.dim() {
            return Err(Error::DimensionMismatch {
                expected: self.store.dim(),
                actual: vector.len(),
            });
        }

        let hits = self.store.index().search(&vector, k)?;
        debug!("query matched {} of {} entries", hits.len(), self.store.len());

        Ok(hits
            .into_iter()
            .filter_map(|(distance, position)| match self.store.chunk(position) {
                Some(chunk) => Some(SearchHit {
                    distance,
                    position,
                    chunk,
                }),
                None => {
                    warn!(
                        "dropping result {} beyond metadata length {}",
                        position,
                        self.store.len()
                    );
                    None
                }
            })
            .collect())
    }
}
