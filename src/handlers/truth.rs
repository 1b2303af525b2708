// src/handlers/truth.rs
use chrono::{DateTime, Utc};
use log::{error, info};
use serde::Serialize;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::models::WeekEntry;
use crate::services::store::TruthStore;

#[derive(Serialize)]
struct TruthResponse<'a> {
    refreshed_at: Option<DateTime<Utc>>,
    weeks: &'a [WeekEntry],
}

pub async fn get_truth(store: Arc<TruthStore>) -> Result<Json, Rejection> {
    info!("Handling request to get weekly ground truth");

    let series = store.snapshot().map_err(|e| {
        error!("Ground truth unavailable: {}", e);
        warp::reject::custom(ApiError::from(e))
    })?;

    Ok(warp::reply::json(&TruthResponse {
        refreshed_at: store.refreshed_at(),
        weeks: &series.weeks,
    }))
}
