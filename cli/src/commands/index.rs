use anyhow::{Context, Result};
use ccbot_config::{Config, Granularity};
use ccbot_core::chunking::read_chunks;
use ccbot_index::{BuildOutcome, IndexBuilder};

use super::providers::{select_embedder, Credentials};

pub fn handle_index(config: &Config, only: Option<Granularity>) -> Result<()> {
    let creds = Credentials::from_env();
    let builder = IndexBuilder::new(select_embedder(&config.embedding, &creds)?);

    let targets = match only {
        Some(g) => vec![g],
        None => vec![Granularity::Daily, Granularity::Weekly],
    };

    for granularity in targets {
        let chunks_path = config.data.chunks_path(granularity);
        let chunks = read_chunks(&chunks_path).with_context(|| {
            format!(
                "failed to read {} (run `ccbot chunk` first)",
                chunks_path.display()
            )
        })?;

        let stem = config.data.index_stem(granularity);
        match builder
            .build(&chunks, &stem)
            .with_context(|| format!("failed to build {} index", granularity))?
        {
            BuildOutcome::Skipped => {
                println!("{}: no chunks, index not written", granularity);
            }
            BuildOutcome::Built { paths, count, dim } => {
                println!(
                    "{}: {} vectors (dim {}) -> {}",
                    granularity,
                    count,
                    dim,
                    paths.index.display()
                );
            }
        }
    }
    Ok(())
}
