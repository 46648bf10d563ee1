mod commands;
mod logging;

use anyhow::Result;
use ccbot_config::{Config, ConfigBuilder, ErrorFormatter};
use clap::Parser;
use commands::{Cli, Commands};

fn load_config(cli: &Cli) -> Result<Config> {
    let builder = match &cli.config {
        Some(path) => ConfigBuilder::new().with_file(path),
        None => ConfigBuilder::new().with_default_file_in("."),
    };
    builder
        .with_env()
        .build()
        .map_err(|e| anyhow::anyhow!("{}", ErrorFormatter::new(e)))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = load_config(&cli)?;
    if let Some(granularity) = cli.granularity {
        config.retrieval.granularity = granularity.into();
    }

    match cli.command {
        Commands::Chunk { raw } => commands::handle_chunk(&config, raw.as_deref())?,
        Commands::Index { only } => commands::handle_index(&config, only.map(Into::into))?,
        Commands::Search { query, top } => commands::handle_search(&config, &query, top)?,
        Commands::Ask {
            question,
            top,
            sources,
        } => commands::handle_ask(&config, &question, top, sources)?,
        Commands::Chat { top } => commands::handle_chat(&config, top)?,
        Commands::Serve { bind } => commands::handle_serve(&config, bind.as_deref())?,
        Commands::Status => commands::handle_status(&config)?,
    }

    Ok(())
}
