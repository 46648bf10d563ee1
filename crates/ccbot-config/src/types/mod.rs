//! Configuration type definitions
//!
//! One module per section. Each type carries its own defaults and validation.

pub mod chunking;
pub mod data;
pub mod embedding;
pub mod llm;
pub mod retrieval;
pub mod server;

pub use chunking::ChunkingConfig;
pub use data::{
    DataConfig, DAILY_CHUNKS_FILE, DAILY_INDEX_STEM, WEEKLY_CHUNKS_FILE, WEEKLY_INDEX_STEM,
};
pub use embedding::{EmbeddingBackend, EmbeddingConfig};
pub use llm::{LlmBackend, LlmConfig};
pub use retrieval::{Granularity, ProfileName, RetrievalConfig};
pub use server::ServerConfig;

use serde::{Deserialize, Serialize};

/// Main configuration struct aggregating all settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Dataset and artifact locations
    #[serde(default)]
    pub data: DataConfig,

    /// Daily/weekly chunking
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Embedding provider settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Answer generation settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Prompt profile, k and which index to query
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl crate::validation::Validate for Config {
    fn validate(&self) -> crate::error::Result<()> {
        self.data.validate()?;
        self.chunking.validate()?;
        self.embedding.validate()?;
        self.llm.validate()?;
        self.retrieval.validate()?;
        self.server.validate()?;

        Ok(())
    }
}
