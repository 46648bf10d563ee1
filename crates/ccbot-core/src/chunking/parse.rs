//! Cell parsing for the raw vaccination table

use chrono::NaiveDate;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse an administered date.
///
/// Datetimes with a `T` or space separator are cut to their date part.
/// Returns `None` for anything unparseable; such rows are excluded.
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    let date_part = cell.split(['T', ' ']).next().unwrap_or(cell);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Parse a numeric counter; missing or garbage cells count as zero.
pub fn parse_count(cell: &str) -> f64 {
    let cleaned: String = cell.trim().chars().filter(|c| *c != ',').collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}
