// src/services/truth.rs
use chrono::{Datelike, Duration, NaiveDate};
use log::{debug, info, warn};
use std::collections::BTreeMap;

use crate::error::{EvalError, Result};
use crate::models::{DailyRecord, FeedRow, WeekEntry, WeeklyTruthSeries};

/// Per-date totals of one feed for `location`. Repeated dates are summed.
fn daily_values(rows: &[FeedRow], location: &str, feed: &str) -> Result<BTreeMap<NaiveDate, i64>> {
    let mut values = BTreeMap::new();
    for row in rows.iter().filter(|r| r.location_name == location) {
        *values.entry(row.date).or_insert(0) += row.value;
    }

    if values.is_empty() {
        return Err(EvalError::DataIntegrity(format!(
            "location '{}' not found in {} feed",
            location, feed
        )));
    }
    Ok(values)
}

/// Inner join of the cases and deaths feeds on date, for one location.
pub fn join_daily(cases: &[FeedRow], deaths: &[FeedRow], location: &str) -> Result<Vec<DailyRecord>> {
    let case_values = daily_values(cases, location, "cases")?;
    let death_values = daily_values(deaths, location, "deaths")?;

    let joined: Vec<DailyRecord> = case_values
        .iter()
        .filter_map(|(date, &new_cases)| {
            death_values.get(date).map(|&new_deaths| DailyRecord {
                location_name: location.to_string(),
                date: *date,
                new_cases,
                new_deaths,
            })
        })
        .collect();

    let dropped = case_values.len() + death_values.len() - 2 * joined.len();
    if dropped > 0 {
        debug!("Dropped {} dates present in only one feed for {}", dropped, location);
    }
    Ok(joined)
}

/// The Saturday closing the week that contains `date`.
pub fn week_ending(date: NaiveDate) -> NaiveDate {
    let days_to_saturday = 6 - date.weekday().num_days_from_sunday();
    date + Duration::days(days_to_saturday as i64)
}

/// Sums daily records into Saturday-ending weeks, oldest first.
///
/// Every week between the first and last observed week is emitted, with zero
/// totals when no record falls into it.
pub fn aggregate_weekly(records: &[DailyRecord]) -> WeeklyTruthSeries {
    let mut totals: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
    for record in records {
        let entry = totals.entry(week_ending(record.date)).or_insert((0, 0));
        entry.0 += record.new_cases;
        entry.1 += record.new_deaths;
    }

    let (first, last) = match (totals.keys().next(), totals.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return WeeklyTruthSeries::default(),
    };

    let mut weeks = Vec::new();
    let mut week_end = first;
    while week_end <= last {
        let (new_cases, new_deaths) = totals.get(&week_end).copied().unwrap_or((0, 0));
        weeks.push(WeekEntry {
            epi_week: week_end.iso_week().week(),
            new_cases,
            new_deaths,
        });
        week_end = week_end + Duration::weeks(1);
    }

    WeeklyTruthSeries::new(weeks)
}

/// Builds the weekly ground truth for `location` from the two raw feeds.
pub fn build_weekly_truth(cases: &[FeedRow], deaths: &[FeedRow], location: &str) -> Result<WeeklyTruthSeries> {
    let joined = join_daily(cases, deaths, location)?;
    if joined.is_empty() {
        warn!("Feeds for {} share no dates, weekly series will be empty", location);
    }

    let series = aggregate_weekly(&joined);
    info!(
        "Aggregated {} daily records for {} into {} weeks",
        joined.len(),
        location,
        series.len()
    );
    Ok(series)
}
