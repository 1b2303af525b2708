// src/services/refresh.rs
use chrono::Utc;
use log::{debug, error, info};
use reqwest::Client;

use crate::config::AppConfig;
use crate::error::Result;
use crate::services::store::TruthStore;
use crate::services::truth::build_weekly_truth;
use crate::services::truth_feed::fetch_daily_feed;

/// Fetches both feeds, rebuilds the weekly series and replaces the stored one.
///
/// On any error the previously stored series stays in place.
pub async fn refresh_truth(client: &Client, store: &TruthStore, config: &AppConfig) -> Result<usize> {
    let cases = fetch_daily_feed(client, &config.cases_feed_url).await?;
    let deaths = fetch_daily_feed(client, &config.deaths_feed_url).await?;

    let series = build_weekly_truth(&cases, &deaths, &config.location)?;
    let weeks = series.len();
    store.replace(series)?;
    Ok(weeks)
}

/// Refreshes when the store is empty or older than `refresh_max_age`.
///
/// Returns whether a refresh happened. Failures are logged, not returned.
pub async fn refresh_if_stale(client: &Client, store: &TruthStore, config: &AppConfig) -> bool {
    let stale = match store.refreshed_at() {
        Some(at) => at < Utc::now() - config.refresh_max_age,
        None => true,
    };
    if !stale {
        debug!("Ground truth is fresh, skipping refresh");
        return false;
    }

    info!("Ground truth is stale, refreshing from truth feeds");
    match refresh_truth(client, store, config).await {
        Ok(weeks) => {
            info!("Ground truth refreshed with {} weeks", weeks);
            true
        }
        Err(e) => {
            error!("Failed to refresh ground truth, keeping previous data: {}", e);
            false
        }
    }
}
