use anyhow::Result;
use ccbot_config::{Config, Granularity};
use ccbot_index::{IndexPaths, IndexStore};
use std::path::Path;

fn presence(path: &Path) -> &'static str {
    if path.exists() {
        "present"
    } else {
        "missing"
    }
}

pub fn handle_status(config: &Config) -> Result<()> {
    println!("Configuration");
    println!("  raw file:     {}", config.data.raw_file.display());
    println!("  week ends:    {}", config.chunking.week_end);
    println!(
        "  embedding:    {} ({}, dim {})",
        config.embedding.backend.as_str(),
        config.embedding.model(),
        config.embedding.dimensions
    );
    println!(
        "  llm:          {} ({})",
        config.llm.backend.as_str(),
        config.llm.model_name()
    );
    println!(
        "  retrieval:    {:?} profile, {} index",
        config.retrieval.profile, config.retrieval.granularity
    );
    println!("  server:       {}", config.server.bind);

    println!();
    println!("Artifacts");
    println!("  raw csv:        {}", presence(&config.data.raw_file));
    for granularity in [Granularity::Daily, Granularity::Weekly] {
        let chunks = config.data.chunks_path(granularity);
        println!(
            "  {:<6} chunks:  {} ({})",
            granularity.as_str(),
            presence(&chunks),
            chunks.display()
        );

        let stem = config.data.index_stem(granularity);
        let paths = IndexPaths::new(&stem);
        if !paths.exist() {
            println!("  {:<6} index:   missing", granularity.as_str());
            continue;
        }
        match IndexStore::load(&stem) {
            Ok(store) => println!(
                "  {:<6} index:   {} entries, dim {}, model {}",
                granularity.as_str(),
                store.len(),
                store.dim(),
                store.model()
            ),
            Err(e) => println!("  {:<6} index:   unreadable ({})", granularity.as_str(), e),
        }
    }
    Ok(())
}
