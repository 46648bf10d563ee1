pub mod builder;
pub mod flat;
pub mod retriever;
pub mod store;

pub use builder::{BuildOutcome, IndexBuilder};
pub use flat::FlatIndex;
pub use retriever::{Retriever, SearchHit};
pub use store::{IndexContainer, IndexPaths, IndexStore, SidecarLine, FORMAT_VERSION};
