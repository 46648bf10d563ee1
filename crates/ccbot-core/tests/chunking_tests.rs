use ccbot_core::chunking::{read_chunks, write_chunks, Aggregator};
use ccbot_core::{Granularity, Period};
use chrono::{NaiveDate, Weekday};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::fs;
use tempfile::tempdir;

const RAW: &str = "\
COUNTY,ADMINISTERED_DATE,DEMOGRAPHIC_CATEGORY,DEMOGRAPHIC_VALUE,PARTIALLY_VACCINATED,FULLY_VACCINATED,AT_LEAST_ONE_DOSE,UP_TO_DATE_COUNT,CUMULATIVE_FULLY_VACCINATED,CUMULATIVE_AT_LEAST_ONE_DOSE,CUMULATIVE_UP_TO_DATE_COUNT,EXTRA
Contra Costa,2022-01-01,Age Group,18-49,5,100,105,90,1000,1200,800,ignored
Contra Costa,2022-01-01,Age Group,65+,1,\"1,500\",3,4,5,6,7,ignored
Contra Costa,01/02/2022,Age Group,18-49,2,3,4,5,6,7,8,ignored
Alameda,2022-01-01T00:00:00,Age Group,18-49,1,1,1,1,1,1,1,ignored
Alameda,,Age Group,18-49,9,9,9,9,9,9,9,ignored
";

#[test]
fn raw_file_to_chunk_artifacts() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let raw = dir.path().join("raw.csv");
    fs::write(&raw, RAW)?;

    let agg = Aggregator::from_csv(&raw)?;
    let daily = agg.daily_chunks();
    let weekly = agg.weekly_chunks();

    // one daily chunk per distinct key
    let keys: HashSet<_> = agg
        .rows()
        .iter()
        .map(|r| {
            (
                r.county.clone(),
                r.administered_date,
                r.demographic_category.clone(),
                r.demographic_value.clone(),
            )
        })
        .collect();
    assert_eq!(daily.len(), keys.len());
    assert_eq!(daily.len(), 4);
    assert_eq!(agg.report().invalid_dates, 1);

    let target = daily
        .iter()
        .find(|c| {
            c.metadata.county == "Contra Costa"
                && c.metadata.demographic_value == "18-49"
                && c.metadata.period
                    == Period::Daily {
                        date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
                    }
        })
        .expect("daily chunk for the 18-49 group");
    assert!(target
        .text
        .starts_with("On 2022-01-01, in Contra Costa, for Age Group: 18-49,"));
    assert!(target.text.contains("100 fully vaccinated"));

    let seniors = daily
        .iter()
        .find(|c| c.metadata.demographic_value == "65+")
        .expect("65+ chunk");
    assert!(seniors.text.contains("1500 fully vaccinated"));

    // 2022-01-01 (Sat) and 2022-01-02 (Sun) share the week ending Jan 2
    let cc_weekly: Vec<_> = weekly
        .iter()
        .filter(|c| c.metadata.county == "Contra Costa" && c.metadata.demographic_value == "18-49")
        .collect();
    assert_eq!(cc_weekly.len(), 1);
    assert!(cc_weekly[0].text.contains(", 7 partially vaccinated, 103 fully vaccinated"));
    assert!(weekly
        .iter()
        .all(|c| c.metadata.granularity() == Granularity::Weekly));

    let daily_path = dir.path().join("processed/daily_chunks_by_county.jsonl");
    write_chunks(&daily_path, &daily)?;
    assert_eq!(read_chunks(&daily_path)?, daily);
    Ok(())
}

#[test]
fn saturday_week_end_splits_weekend() -> anyhow::Result<()> {
    let agg = Aggregator::from_reader(RAW.as_bytes())?.with_week_end(Weekday::Sat);
    let weeks: Vec<NaiveDate> = agg
        .weekly_chunks()
        .into_iter()
        .filter(|c| c.metadata.county == "Contra Costa" && c.metadata.demographic_value == "18-49")
        .map(|c| c.metadata.period.date())
        .collect();
    assert_eq!(
        weeks,
        vec![
            NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2022, 1, 8).unwrap(),
        ]
    );
    Ok(())
}

#[test]
fn output_is_deterministic() -> anyhow::Result<()> {
    let a = Aggregator::from_reader(RAW.as_bytes())?;
    let b = Aggregator::from_reader(RAW.as_bytes())?;
    assert_eq!(a.daily_chunks(), b.daily_chunks());
    assert_eq!(a.weekly_chunks(), b.weekly_chunks());
    Ok(())
}

const HEADER: &str = "COUNTY,ADMINISTERED_DATE,DEMOGRAPHIC_CATEGORY,DEMOGRAPHIC_VALUE,\
PARTIALLY_VACCINATED,FULLY_VACCINATED,AT_LEAST_ONE_DOSE,UP_TO_DATE_COUNT,\
CUMULATIVE_FULLY_VACCINATED,CUMULATIVE_AT_LEAST_ONE_DOSE,CUMULATIVE_UP_TO_DATE_COUNT";

#[test]
fn weekly_bucket_with_only_missing_counters_renders_zeros() -> anyhow::Result<()> {
    let csv = format!(
        "{HEADER}\n\
         Contra Costa,2022-01-03,Race,Asian,,,,,,,\n\
         Contra Costa,2022-01-05,Race,Asian,,,,,,,\n"
    );
    let weekly = Aggregator::from_reader(csv.as_bytes())?.weekly_chunks();

    assert_eq!(weekly.len(), 1);
    assert_eq!(
        weekly[0].metadata.period,
        Period::Weekly {
            week_ending: NaiveDate::from_ymd_opt(2022, 1, 9).unwrap(),
        }
    );
    assert_eq!(
        weekly[0].text,
        "In the week ending 2022-01-09, in Contra Costa, for Race: Asian, 0 partially vaccinated, \
         0 fully vaccinated, 0 with at least one dose, and 0 up-to-date. \
         Cumulative totals: 0 fully vaccinated, 0 with at least one dose, 0 up-to-date."
    );
    Ok(())
}

#[test]
fn malformed_row_does_not_disturb_its_group() -> anyhow::Result<()> {
    let csv = format!(
        "{HEADER}\n\
         Contra Costa,2022-01-03,Age Group,18-49,1,10,0,0,0,0,0\n\
         Contra Costa,2022-01-03,,18-49,500,500,500,500,500,500,500\n\
         Contra Costa,2022-01-04,Age Group\n\
         Contra Costa,2022-01-04,Age Group,18-49,2,20,0,0,0,0,0\n"
    );
    let agg = Aggregator::from_reader(csv.as_bytes())?;

    let report = agg.report();
    assert_eq!(report.total_rows, 4);
    assert_eq!(report.kept_rows, 2);
    let skipped: Vec<(u64, &str)> = report
        .malformed
        .iter()
        .map(|s| (s.line, s.reason.as_str()))
        .collect();
    assert_eq!(
        skipped,
        vec![(3, "blank DEMOGRAPHIC_CATEGORY"), (4, "blank DEMOGRAPHIC_VALUE")]
    );

    let daily = agg.daily_chunks();
    assert_eq!(daily.len(), 2);
    assert!(daily[0].text.contains("1 partially vaccinated, 10 fully vaccinated"));
    assert!(daily[1].text.contains("2 partially vaccinated, 20 fully vaccinated"));

    let weekly = agg.weekly_chunks();
    assert_eq!(weekly.len(), 1);
    assert!(weekly[0].text.contains("3 partially vaccinated, 30 fully vaccinated"));
    Ok(())
}
