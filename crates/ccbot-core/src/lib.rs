pub mod artifacts;
pub mod chunking;
pub mod embeddings;
pub mod error;
pub mod llm;
pub mod models;

pub use ccbot_config::Granularity;
pub use error::{Error, Result};
pub use models::{Chunk, ChunkMetadata, Counters, Period, RawRow};
