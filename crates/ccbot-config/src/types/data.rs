//! Data locations: raw dataset, processed chunk artifacts, index artifacts

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::validation::validate_non_empty;

/// File chunk artifact names inside `processed_dir`
pub const DAILY_CHUNKS_FILE: &str = "daily_chunks_by_county.jsonl";
pub const WEEKLY_CHUNKS_FILE: &str = "weekly_chunks_by_county.jsonl";

/// Index stems inside `index_dir`
pub const DAILY_INDEX_STEM: &str = "daily_index";
pub const WEEKLY_INDEX_STEM: &str = "weekly_index";

/// Paths used by the batch and query stages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Raw vaccination CSV
    #[serde(default = "default_raw_file")]
    pub raw_file: PathBuf,

    /// Directory holding the daily/weekly chunk JSONL files
    #[serde(default = "default_processed_dir")]
    pub processed_dir: PathBuf,

    /// Directory holding `<stem>.idx` + `<stem>.jsonl`
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,
}

impl DataConfig {
    pub fn daily_chunks_path(&self) -> PathBuf {
        self.processed_dir.join(DAILY_CHUNKS_FILE)
    }

    pub fn weekly_chunks_path(&self) -> PathBuf {
        self.processed_dir.join(WEEKLY_CHUNKS_FILE)
    }

    /// Index stem for a granularity, e.g. `data/index/daily_index`
    pub fn index_stem(&self, granularity: crate::Granularity) -> PathBuf {
        match granularity {
            crate::Granularity::Daily => self.index_dir.join(DAILY_INDEX_STEM),
            crate::Granularity::Weekly => self.index_dir.join(WEEKLY_INDEX_STEM),
        }
    }

    /// Chunk artifact for a granularity
    pub fn chunks_path(&self, granularity: crate::Granularity) -> PathBuf {
        match granularity {
            crate::Granularity::Daily => self.daily_chunks_path(),
            crate::Granularity::Weekly => self.weekly_chunks_path(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            raw_file: default_raw_file(),
            processed_dir: default_processed_dir(),
            index_dir: default_index_dir(),
        }
    }
}

impl crate::validation::Validate for DataConfig {
    fn validate(&self) -> crate::error::Result<()> {
        validate_non_empty("data.raw_file", &self.raw_file.to_string_lossy())?;
        validate_non_empty("data.processed_dir", &self.processed_dir.to_string_lossy())?;
        validate_non_empty("data.index_dir", &self.index_dir.to_string_lossy())?;
        Ok(())
    }
}

fn default_raw_file() -> PathBuf {
    PathBuf::from("data/raw/covid-19-vaccines-administered-by-demographics-by-county.csv")
}

fn default_processed_dir() -> PathBuf {
    PathBuf::from("data/processed")
}

fn default_index_dir() -> PathBuf {
    PathBuf::from("data/index")
}
