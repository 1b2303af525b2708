// src/routes.rs
use std::sync::Arc;
use warp::reject::Rejection;
use crate::config::AppConfig;
use crate::handlers::{evaluate::evaluate, evaluate::WindowQuery, truth::get_truth};
use crate::services::store::TruthStore;
use log::info;

use std::convert::Infallible;
use warp::http::StatusCode;
use warp::{Filter, Reply};
use crate::handlers::error::ApiError;

// Turns every rejection into a JSON error body
async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message: String;

    if err.is_not_found() {
        code = StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        code = StatusCode::PAYLOAD_TOO_LARGE;
        message = "The uploaded file with predictions is too large".to_string();
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        code = StatusCode::BAD_REQUEST;
        message = "first_n_weeks and last_n_weeks must be positive integers".to_string();
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        code = StatusCode::LENGTH_REQUIRED;
        message = "Content-Length header is required".to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else {
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(
    store: Arc<TruthStore>,
    config: &AppConfig,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let store_filter = warp::any().map(move || store.clone());
    let recent_weeks = config.recent_weeks;

    let evaluate_route = warp::path!("evaluate")
        .and(warp::post())
        .and(warp::query::<WindowQuery>())
        .and(warp::header::optional::<String>("content-type"))
        .and(warp::body::content_length_limit(config.max_upload_bytes))
        .and(warp::body::bytes())
        .and(store_filter.clone())
        .and(warp::any().map(move || recent_weeks))
        .and_then(evaluate);

    let truth_route = warp::path!("api" / "v1" / "truth")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_truth);

    info!("All routes configured successfully.");

    evaluate_route
        .or(truth_route)
        .recover(handle_rejection)
}
