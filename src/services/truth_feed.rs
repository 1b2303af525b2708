// src/services/truth_feed.rs
use chrono::NaiveDate;
use csv::Reader;
use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;
use std::io::Read;

use crate::error::{EvalError, Result};
use crate::models::FeedRow;

#[derive(Debug, Deserialize)]
struct RawFeedRow {
    location_name: String,
    date: NaiveDate,
    value: Option<f64>,
}

/// Parses a daily truth CSV (`location_name,date,value`, extra columns ignored).
///
/// Rows without a value are not yet available and are skipped.
pub fn parse_daily_feed<R: Read>(reader: R) -> Result<Vec<FeedRow>> {
    let mut rdr = Reader::from_reader(reader);
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for result in rdr.deserialize::<RawFeedRow>() {
        let raw = result?;
        let value = match raw.value {
            Some(v) => v,
            None => {
                skipped += 1;
                continue;
            }
        };
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(EvalError::DataIntegrity(format!(
                "non-integer value {} for {} on {}",
                value, raw.location_name, raw.date
            )));
        }
        rows.push(FeedRow {
            location_name: raw.location_name,
            date: raw.date,
            value: value as i64,
        });
    }

    if skipped > 0 {
        debug!("Skipped {} feed rows without a value", skipped);
    }
    Ok(rows)
}

/// Download a daily truth feed and parse it.
pub async fn fetch_daily_feed(client: &Client, url: &str) -> Result<Vec<FeedRow>> {
    info!("Fetching truth feed CSV from URL: {}", url);

    let csv_text = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    let rows = parse_daily_feed(csv_text.as_bytes())?;

    info!("Parsed {} rows from {}", rows.len(), url);
    Ok(rows)
}
