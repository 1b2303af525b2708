// src/bin/score_predictions.rs
use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use std::{env, fs};

use forecast_eval::config::AppConfig;
use forecast_eval::models::WindowSelector;
use forecast_eval::services::predictions::parse_predictions;
use forecast_eval::services::report::evaluate_submission;
use forecast_eval::services::store::TruthStore;

fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let path = match args.get(1) {
        Some(path) => path,
        None => bail!("usage: {} <predictions.txt> [--first N | --last N]", args[0]),
    };

    let selector = match (args.get(2).map(String::as_str), args.get(3)) {
        (None, _) => WindowSelector::All,
        (Some(flag), Some(n)) => {
            let weeks: usize = n.parse().with_context(|| format!("invalid week count '{}'", n))?;
            match flag {
                "--first" => WindowSelector::from_options(Some(weeks), None)?,
                "--last" => WindowSelector::from_options(None, Some(weeks))?,
                other => bail!("unknown option '{}'", other),
            }
        }
        (Some(flag), None) => bail!("option '{}' needs a number of weeks", flag),
    };

    let config = AppConfig::from_env()?;
    let store = TruthStore::open(&config.truth_csv_path)?;
    let series = store.snapshot()?;

    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    let predictions = parse_predictions(&text)?;
    let report = evaluate_submission(&predictions, &series, config.recent_weeks, selector)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
