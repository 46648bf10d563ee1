use anyhow::{Context, Result};
use ccbot_config::Config;
use ccbot_core::chunking::{stage_chunks, Aggregator};
use std::path::Path;
use tracing::warn;

pub fn handle_chunk(config: &Config, raw: Option<&Path>) -> Result<()> {
    let raw = raw.unwrap_or(&config.data.raw_file);
    let week_end = config.chunking.week_end_day()?;

    let aggregator = Aggregator::from_csv(raw)
        .with_context(|| format!("failed to load raw data from {}", raw.display()))?
        .with_week_end(week_end);

    let daily = aggregator.daily_chunks();
    let weekly = aggregator.weekly_chunks();

    let daily_path = config.data.daily_chunks_path();
    let weekly_path = config.data.weekly_chunks_path();
    // both files are fully written before either replaces its predecessor
    let staged = [(&daily_path, &daily), (&weekly_path, &weekly)]
        .into_iter()
        .map(|(path, chunks)| {
            stage_chunks(path, chunks)
                .with_context(|| format!("failed to write {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    for artifact in staged {
        let target = artifact.target().display().to_string();
        artifact
            .commit()
            .with_context(|| format!("failed to replace {}", target))?;
    }

    let report = aggregator.report();
    if !report.malformed.is_empty() {
        warn!("{} rows skipped for blank keys", report.malformed.len());
    }

    println!(
        "Rows: {} read, {} used, {} with unparseable dates, {} with blank keys",
        report.total_rows,
        report.kept_rows,
        report.invalid_dates,
        report.malformed.len()
    );
    println!("Daily chunks:  {} -> {}", daily.len(), daily_path.display());
    println!("Weekly chunks: {} -> {}", weekly.len(), weekly_path.display());
    Ok(())
}
