use anyhow::{Context, Result};
use ccbot_config::Config;
use ccbot_index::Retriever;
use ccbot_pipeline::PromptProfile;

use super::providers::{select_embedder, Credentials};

pub fn handle_search(config: &Config, query: &str, top: Option<usize>) -> Result<()> {
    let stem = config.data.index_stem(config.retrieval.granularity);
    let embedder = select_embedder(&config.embedding, &Credentials::from_env())?;
    let retriever = Retriever::open(&stem, embedder)
        .with_context(|| format!("failed to open index at {}", stem.display()))?;

    let k = top.unwrap_or_else(|| PromptProfile::from_config(&config.retrieval).top_k);
    let hits = retriever.search(query, k)?;

    if hits.is_empty() {
        println!("No results.");
        return Ok(());
    }
    for (rank, hit) in hits.iter().enumerate() {
        println!(
            "{}. [{:.4}] #{} {}",
            rank + 1,
            hit.distance,
            hit.position,
            hit.chunk.text
        );
    }
    Ok(())
}
