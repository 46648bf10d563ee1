pub mod ask;
pub mod chat;
pub mod chunk;
pub mod index;
pub mod providers;
pub mod search;
pub mod serve;
pub mod status;

pub use ask::handle_ask;
pub use chat::handle_chat;
pub use chunk::handle_chunk;
pub use index::handle_index;
pub use search::handle_search;
pub use serve::handle_serve;
pub use status::handle_status;

use ccbot_config::Granularity;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ccbot")]
#[command(about = "Question answering over Contra Costa County COVID-19 vaccination data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Which index to query (overrides retrieval.granularity)
    #[arg(long, value_enum, global = true)]
    pub granularity: Option<CliGranularity>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliGranularity {
    Daily,
    Weekly,
}

impl From<CliGranularity> for Granularity {
    fn from(value: CliGranularity) -> Self {
        match value {
            CliGranularity::Daily => Granularity::Daily,
            CliGranularity::Weekly => Granularity::Weekly,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Turn the raw CSV into daily and weekly chunk files
    Chunk {
        /// Raw CSV (defaults to data.raw_file)
        #[arg(long, value_name = "FILE")]
        raw: Option<PathBuf>,
    },
    /// Embed chunk files and write the daily/weekly indexes
    Index {
        /// Build only one of the two indexes
        #[arg(long, value_enum)]
        only: Option<CliGranularity>,
    },
    /// Show the nearest chunks for a query
    Search {
        query: String,
        /// Number of results (defaults to the prompt profile's k)
        #[arg(short = 'k', long)]
        top: Option<usize>,
    },
    /// Answer one question
    Ask {
        question: String,
        #[arg(short = 'k', long)]
        top: Option<usize>,
        /// Print the retrieved chunks after the answer
        #[arg(long, default_value_t = false)]
        sources: bool,
    },
    /// Interactive question loop
    Chat {
        #[arg(short = 'k', long)]
        top: Option<usize>,
    },
    /// Serve /hello and /ask over HTTP
    Serve {
        /// Listen address (overrides server.bind)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Show configuration and artifact state
    Status,
}
