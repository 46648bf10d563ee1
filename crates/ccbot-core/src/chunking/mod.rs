//! Raw table to daily/weekly chunks
//!
//! Rows are grouped by (county, date, category, value) for daily chunks and by
//! (county, category, value, week) for weekly chunks. Groups are kept in
//! `BTreeMap`s so output order follows the grouping key on every run.

pub mod parse;

pub use crate::artifacts::{read_chunks, stage_chunks, write_chunks, StagedChunks};

use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::{Chunk, ChunkMetadata, Counters, Period, RawRow};

pub const COL_COUNTY: &str = "COUNTY";
pub const COL_DATE: &str = "ADMINISTERED_DATE";
pub const COL_CATEGORY: &str = "DEMOGRAPHIC_CATEGORY";
pub const COL_VALUE: &str = "DEMOGRAPHIC_VALUE";

const COUNTER_COLUMNS: [&str; 7] = [
    "PARTIALLY_VACCINATED",
    "FULLY_VACCINATED",
    "AT_LEAST_ONE_DOSE",
    "UP_TO_DATE_COUNT",
    "CUMULATIVE_FULLY_VACCINATED",
    "CUMULATIVE_AT_LEAST_ONE_DOSE",
    "CUMULATIVE_UP_TO_DATE_COUNT",
];

/// A row left out of aggregation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}

/// What happened to the input rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    /// Rows whose county, category or value is blank, missing or not UTF-8
    pub malformed: Vec<SkippedRow>,
    /// Rows whose date could not be parsed
    pub invalid_dates: usize,
}

/// Resolved column positions
struct Columns {
    county: usize,
    date: usize,
    category: usize,
    value: usize,
    counters: [usize; 7],
}

impl Columns {
    fn resolve(headers: &csv::ByteRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| String::from_utf8_lossy(h).trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| Error::MissingColumn(name.to_string()))
        };

        let county = find(COL_COUNTY)?;
        let date = find(COL_DATE)?;
        let category = find(COL_CATEGORY)?;
        let value = find(COL_VALUE)?;

        let mut counters = [0usize; 7];
        for (slot, name) in counters.iter_mut().zip(COUNTER_COLUMNS) {
            *slot = find(name)?;
        }

        Ok(Self {
            county,
            date,
            category,
            value,
            counters,
        })
    }
}

pub struct Aggregator {
    rows: Vec<RawRow>,
    report: AggregationReport,
    week_end: Weekday,
}

impl Aggregator {
    /// Load the raw table from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::from_io(e, path))?;
        let aggregator = Self::from_reader(file)?;
        info!(
            "loaded {} of {} rows from {}",
            aggregator.report.kept_rows,
            aggregator.report.total_rows,
            path.display()
        );
        Ok(aggregator)
    }

    /// Load the raw table from any CSV source with a header row
    ///
    /// Short rows and cells that are not UTF-8 do not abort the load: a row
    /// whose county, category or value is blank, missing or undecodable is
    /// skipped and recorded in the report. Undecodable counters count as zero.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.byte_headers().map_err(malformed)?.clone();
        let columns = Columns::resolve(&headers)?;

        let mut rows = Vec::new();
        let mut report = AggregationReport::default();

        for record in reader.byte_records() {
            let record = record.map_err(malformed)?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            report.total_rows += 1;

            let cell = |idx: usize| text_cell(&record, idx);

            let keys = [
                (COL_COUNTY, cell(columns.county)),
                (COL_CATEGORY, cell(columns.category)),
                (COL_VALUE, cell(columns.value)),
            ];
            let bad_key = keys.iter().find_map(|(name, v)| match v {
                Err(why) => Some(format!("{} {}", name, why)),
                Ok("") => Some(format!("blank {}", name)),
                Ok(_) => None,
            });
            if let Some(reason) = bad_key {
                warn!("skipping row at line {}: {}", line, reason);
                report.malformed.push(SkippedRow { line, reason });
                continue;
            }
            let [(_, Ok(county)), (_, Ok(category)), (_, Ok(value))] = keys else {
                continue;
            };

            let Some(administered_date) = cell(columns.date).ok().and_then(parse::parse_date)
            else {
                debug!("excluding row at line {}: unparseable date", line);
                report.invalid_dates += 1;
                continue;
            };

            let c = columns
                .counters
                .map(|idx| cell(idx).map(parse::parse_count).unwrap_or(0.0));
            rows.push(RawRow {
                county: county.to_string(),
                administered_date,
                demographic_category: category.to_string(),
                demographic_value: value.to_string(),
                counters: Counters {
                    partially_vaccinated: c[0],
                    fully_vaccinated: c[1],
                    at_least_one_dose: c[2],
                    up_to_date_count: c[3],
                    cumulative_fully_vaccinated: c[4],
                    cumulative_at_least_one_dose: c[5],
                    cumulative_up_to_date_count: c[6],
                },
            });
        }

        report.kept_rows = rows.len();
        Ok(Self::from_rows(rows).with_report(report))
    }

    /// Aggregate already-parsed rows
    pub fn from_rows(rows: Vec<RawRow>) -> Self {
        let report = AggregationReport {
            total_rows: rows.len(),
            kept_rows: rows.len(),
            ..Default::default()
        };
        Self {
            rows,
            report,
            week_end: Weekday::Sun,
        }
    }

    fn with_report(mut self, report: AggregationReport) -> Self {
        self.report = report;
        self
    }

    /// Weekday that closes each weekly bucket (default Sunday)
    pub fn with_week_end(mut self, week_end: Weekday) -> Self {
        self.week_end = week_end;
        self
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn report(&self) -> &AggregationReport {
        &self.report
    }

    /// One chunk per (county, date, category, value)
    pub fn daily_chunks(&self) -> Vec<Chunk> {
        let mut groups: BTreeMap<(&str, NaiveDate, &str, &str), Counters> = BTreeMap::new();
        for row in &self.rows {
            let key = (
                row.county.as_str(),
                row.administered_date,
                row.demographic_category.as_str(),
                row.demographic_value.as_str(),
            );
            *groups.entry(key).or_default() += &row.counters;
        }

        let chunks: Vec<Chunk> = groups
            .into_iter()
            .map(|((county, date, category, value), counters)| {
                Chunk::render(
                    ChunkMetadata {
                        county: county.to_string(),
                        period: Period::Daily { date },
                        demographic_category: category.to_string(),
                        demographic_value: value.to_string(),
                    },
                    &counters,
                )
            })
            .collect();

        info!("built {} daily chunks", chunks.len());
        chunks
    }

    /// One chunk per non-empty (county, category, value, week) bucket
    pub fn weekly_chunks(&self) -> Vec<Chunk> {
        let mut groups: BTreeMap<(&str, &str, &str, NaiveDate), Counters> = BTreeMap::new();
        for row in &self.rows {
            let key = (
                row.county.as_str(),
                row.demographic_category.as_str(),
                row.demographic_value.as_str(),
                week_ending(row.administered_date, self.week_end),
            );
            *groups.entry(key).or_default() += &row.counters;
        }

        let chunks: Vec<Chunk> = groups
            .into_iter()
            .map(|((county, category, value, week_ending), counters)| {
                Chunk::render(
                    ChunkMetadata {
                        county: county.to_string(),
                        period: Period::Weekly { week_ending },
                        demographic_category: category.to_string(),
                        demographic_value: value.to_string(),
                    },
                    &counters,
                )
            })
            .collect();

        info!(
            "built {} weekly chunks (weeks ending {:?})",
            chunks.len(),
            self.week_end
        );
        chunks
    }
}

/// Last day of the week containing `date`, for weeks closing on `week_end`
pub fn week_ending(date: NaiveDate, week_end: Weekday) -> NaiveDate {
    let ahead = (7 + week_end.num_days_from_monday() - date.weekday().num_days_from_monday()) % 7;
    date.checked_add_days(Days::new(ahead as u64)).unwrap_or(date)
}

/// Trimmed cell text; a missing cell reads as blank
fn text_cell(record: &csv::ByteRecord, idx: usize) -> std::result::Result<&str, &'static str> {
    match record.get(idx) {
        None => Ok(""),
        Some(bytes) => std::str::from_utf8(bytes)
            .map(str::trim)
            .map_err(|_| "is not valid UTF-8"),
    }
}

fn malformed(err: csv::Error) -> Error {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    Error::MalformedRow {
        line,
        reason: err.to_string(),
    }
}
