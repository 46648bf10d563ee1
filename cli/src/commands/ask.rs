use anyhow::Result;
use ccbot_config::Config;

use super::providers::{build_pipeline, Credentials};

pub fn handle_ask(
    config: &Config,
    question: &str,
    top: Option<usize>,
    sources: bool,
) -> Result<()> {
    let pipeline = build_pipeline(config, &Credentials::from_env())?;
    let answer = pipeline.ask(question, top)?;

    println!("{}", answer.text);
    if sources {
        println!();
        println!("Sources:");
        for hit in &answer.sources {
            println!(" - [{:.4}] {}", hit.distance, hit.chunk.text);
        }
    }
    Ok(())
}
