//! Chunking configuration

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Settings for turning raw rows into daily and weekly chunks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Weekday that closes each weekly bucket
    #[serde(default = "default_week_end")]
    pub week_end: String,
}

impl ChunkingConfig {
    /// Parsed `week_end`
    pub fn week_end_day(&self) -> crate::error::Result<Weekday> {
        self.week_end
            .trim()
            .parse::<Weekday>()
            .map_err(|_| ConfigError::invalid_enum("chunking.week_end", &self.week_end, &WEEKDAYS))
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            week_end: default_week_end(),
        }
    }
}

impl crate::validation::Validate for ChunkingConfig {
    fn validate(&self) -> crate::error::Result<()> {
        self.week_end_day().map(|_| ())
    }
}

fn default_week_end() -> String {
    "sunday".to_string()
}
