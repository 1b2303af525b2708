use anyhow::{anyhow, Result};
use dotenv::dotenv;
use log::info;
use reqwest::Client;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use warp::Filter;

use forecast_eval::config::AppConfig;
use forecast_eval::routes;
use forecast_eval::services::refresh::refresh_if_stale;
use forecast_eval::services::store::TruthStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = Arc::new(AppConfig::from_env()?);
    let store = Arc::new(TruthStore::open(&config.truth_csv_path)?);
    let client = Client::new();

    // Initial fetch when the stored truth is missing or old
    {
        let (client, store, config) = (client.clone(), store.clone(), config.clone());
        tokio::spawn(async move {
            refresh_if_stale(&client, &store, &config).await;
        });
    }

    let scheduler = JobScheduler::new()
        .await
        .map_err(|e| anyhow!("Failed to create scheduler: {:?}", e))?;
    let schedule = config.refresh_schedule.clone();
    let refresh_job = {
        let (client, store, config) = (client.clone(), store.clone(), config.clone());
        Job::new_async(schedule.as_str(), move |_uuid, _scheduler| {
            let (client, store, config) = (client.clone(), store.clone(), config.clone());
            Box::pin(async move {
                refresh_if_stale(&client, &store, &config).await;
            })
        })
        .map_err(|e| anyhow!("Invalid REFRESH_SCHEDULE '{}': {:?}", schedule, e))?
    };
    scheduler
        .add(refresh_job)
        .await
        .map_err(|e| anyhow!("Failed to schedule truth refresh: {:?}", e))?;
    scheduler
        .start()
        .await
        .map_err(|e| anyhow!("Failed to start scheduler: {:?}", e))?;
    info!("Truth refresh scheduled with '{}'", config.refresh_schedule);

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Will bind to: {}", addr);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET", "POST"]);

    let api = routes::routes(store, &config).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
    Ok(())
}
