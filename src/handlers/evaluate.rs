// src/handlers/evaluate.rs
use log::{error, info, warn};
use serde::Deserialize;
use std::sync::Arc;
use warp::hyper::body::Bytes;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::models::WindowSelector;
use crate::services::predictions::parse_predictions;
use crate::services::report::evaluate_submission;
use crate::services::store::TruthStore;

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub first_n_weeks: Option<usize>,
    pub last_n_weeks: Option<usize>,
}

/// Uploads without a content type are read as text; any other type must be `text/plain`.
fn is_plain_text(content_type: Option<&str>) -> bool {
    match content_type {
        None => true,
        Some(value) => value
            .split(';')
            .next()
            .map(|mime| mime.trim().eq_ignore_ascii_case("text/plain"))
            .unwrap_or(false),
    }
}

pub async fn evaluate(
    query: WindowQuery,
    content_type: Option<String>,
    body: Bytes,
    store: Arc<TruthStore>,
    recent_weeks: usize,
) -> Result<Json, Rejection> {
    info!("Handling forecast evaluation ({} bytes)", body.len());

    let selector = WindowSelector::from_options(query.first_n_weeks, query.last_n_weeks).map_err(|e| {
        warn!("Rejected window selector: {}", e);
        warp::reject::custom(ApiError::from(e))
    })?;

    if !is_plain_text(content_type.as_deref()) {
        warn!("Rejected upload with content type {:?}", content_type);
        return Err(warp::reject::custom(ApiError::bad_request(
            "The uploaded file is not a text file",
        )));
    }

    let text = std::str::from_utf8(&body).map_err(|_| {
        warn!("Uploaded predictions are not valid UTF-8");
        warp::reject::custom(ApiError::bad_request("The uploaded file is not a text file"))
    })?;

    let predictions = parse_predictions(text).map_err(|e| {
        warn!("Failed to parse predictions: {}", e);
        warp::reject::custom(ApiError::from(e))
    })?;

    let series = store.snapshot().map_err(|e| {
        error!("Ground truth unavailable: {}", e);
        warp::reject::custom(ApiError::from(e))
    })?;

    let report = evaluate_submission(&predictions, &series, recent_weeks, selector).map_err(|e| {
        if e.is_client_error() {
            warn!("Evaluation rejected: {}", e);
        } else {
            error!("Evaluation failed: {}", e);
        }
        warp::reject::custom(ApiError::from(e))
    })?;

    Ok(warp::reply::json(&report))
}
