use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;

use crate::Granularity;

/// The seven numeric columns summed per group
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Counters {
    pub partially_vaccinated: f64,
    pub fully_vaccinated: f64,
    pub at_least_one_dose: f64,
    pub up_to_date_count: f64,
    pub cumulative_fully_vaccinated: f64,
    pub cumulative_at_least_one_dose: f64,
    pub cumulative_up_to_date_count: f64,
}

impl AddAssign<&Counters> for Counters {
    fn add_assign(&mut self, other: &Counters) {
        self.partially_vaccinated += other.partially_vaccinated;
        self.fully_vaccinated += other.fully_vaccinated;
        self.at_least_one_dose += other.at_least_one_dose;
        self.up_to_date_count += other.up_to_date_count;
        self.cumulative_fully_vaccinated += other.cumulative_fully_vaccinated;
        self.cumulative_at_least_one_dose += other.cumulative_at_least_one_dose;
        self.cumulative_up_to_date_count += other.cumulative_up_to_date_count;
    }
}

/// One usable row of the raw table
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub county: String,
    pub administered_date: NaiveDate,
    pub demographic_category: String,
    pub demographic_value: String,
    pub counters: Counters,
}

/// The date a chunk describes, tagged with its granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "granularity", rename_all = "lowercase")]
pub enum Period {
    Daily { date: NaiveDate },
    Weekly { week_ending: NaiveDate },
}

impl Period {
    pub fn granularity(&self) -> Granularity {
        match self {
            Period::Daily { .. } => Granularity::Daily,
            Period::Weekly { .. } => Granularity::Weekly,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Period::Daily { date } => *date,
            Period::Weekly { week_ending } => *week_ending,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Daily { date } => write!(f, "On {}", date),
            Period::Weekly { week_ending } => write!(f, "In the week ending {}", week_ending),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub county: String,
    #[serde(flatten)]
    pub period: Period,
    pub demographic_category: String,
    pub demographic_value: String,
}

impl ChunkMetadata {
    pub fn granularity(&self) -> Granularity {
        self.period.granularity()
    }
}

/// A rendered sentence plus the metadata it was rendered from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Render a chunk from one aggregation group
    ///
    /// Sums are truncated toward zero when printed.
    pub fn render(metadata: ChunkMetadata, counters: &Counters) -> Self {
        let n = |v: f64| v.trunc() as i64;
        let text = format!(
            "{}, in {}, for {}: {}, {} partially vaccinated, {} fully vaccinated, \
             {} with at least one dose, and {} up-to-date. Cumulative totals: \
             {} fully vaccinated, {} with at least one dose, {} up-to-date.",
            metadata.period,
            metadata.county,
            metadata.demographic_category,
            metadata.demographic_value,
            n(counters.partially_vaccinated),
            n(counters.fully_vaccinated),
            n(counters.at_least_one_dose),
            n(counters.up_to_date_count),
            n(counters.cumulative_fully_vaccinated),
            n(counters.cumulative_at_least_one_dose),
            n(counters.cumulative_up_to_date_count),
        );
        Self { text, metadata }
    }
}
