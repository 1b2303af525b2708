// src/bin/preprocess_truth.rs
use anyhow::Result;
use dotenv::dotenv;
use log::info;
use reqwest::Client;

use forecast_eval::config::AppConfig;
use forecast_eval::services::refresh::refresh_truth;
use forecast_eval::services::store::TruthStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env()?;
    let store = TruthStore::open(&config.truth_csv_path)?;

    info!("Rebuilding weekly ground truth for {}", config.location);
    let weeks = refresh_truth(&Client::new(), &store, &config).await?;

    println!(
        "Wrote {} weeks for {} to {}",
        weeks,
        config.location,
        store.path().display()
    );
    Ok(())
}
