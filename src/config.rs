// src/config.rs
use anyhow::{bail, Context, Result};
use chrono::Duration;
use log::{info, warn};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_CASES_FEED_URL: &str = "https://raw.githubusercontent.com/covid19-forecast-hub-europe/\
covid19-forecast-hub-europe/main/data-truth/JHU/truth_JHU-Incident%20Cases.csv";
pub const DEFAULT_DEATHS_FEED_URL: &str = "https://raw.githubusercontent.com/covid19-forecast-hub-europe/\
covid19-forecast-hub-europe/main/data-truth/JHU/truth_JHU-Incident%20Deaths.csv";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub truth_csv_path: PathBuf,
    pub location: String,
    pub cases_feed_url: String,
    pub deaths_feed_url: String,
    pub refresh_max_age: Duration,
    /// Cron expression with a seconds field.
    pub refresh_schedule: String,
    pub recent_weeks: usize,
    pub max_upload_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            port: 33507,
            truth_csv_path: PathBuf::from("covid.slovenia.week.csv"),
            location: "Slovenia".to_string(),
            cases_feed_url: DEFAULT_CASES_FEED_URL.to_string(),
            deaths_feed_url: DEFAULT_DEATHS_FEED_URL.to_string(),
            refresh_max_age: Duration::hours(24),
            refresh_schedule: "0 0 * * * *".to_string(),
            recent_weeks: 10,
            max_upload_bytes: 1024 * 1024,
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr + std::fmt::Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid value, got '{}'", name, raw)),
        Err(_) => {
            warn!("${} not set, defaulting to {}", name, default);
            Ok(default)
        }
    }
}

/// Converts `REFRESH_MAX_AGE_HOURS` into a duration, rejecting zero, negatives and overflow.
pub fn refresh_max_age(hours: i64) -> Result<Duration> {
    if hours <= 0 {
        bail!("REFRESH_MAX_AGE_HOURS must be positive, got {}", hours);
    }
    match Duration::try_hours(hours) {
        Some(age) => Ok(age),
        None => bail!("REFRESH_MAX_AGE_HOURS is out of range, got {}", hours),
    }
}

impl AppConfig {
    /// Reads the configuration from the environment (call `dotenv` first).
    pub fn from_env() -> Result<Self> {
        let defaults = AppConfig::default();

        let refresh_max_age = refresh_max_age(parse_var("REFRESH_MAX_AGE_HOURS", 24)?)?;
        let recent_weeks: usize = parse_var("RECENT_WEEKS", defaults.recent_weeks)?;
        if recent_weeks == 0 {
            bail!("RECENT_WEEKS must be positive");
        }

        let config = AppConfig {
            port: parse_var("PORT", defaults.port)?,
            truth_csv_path: env::var("TRUTH_CSV_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.truth_csv_path),
            location: env::var("TRUTH_LOCATION").unwrap_or(defaults.location),
            cases_feed_url: env::var("CASES_FEED_URL").unwrap_or(defaults.cases_feed_url),
            deaths_feed_url: env::var("DEATHS_FEED_URL").unwrap_or(defaults.deaths_feed_url),
            refresh_max_age,
            refresh_schedule: env::var("REFRESH_SCHEDULE").unwrap_or(defaults.refresh_schedule),
            recent_weeks,
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        };

        info!(
            "Configured for {} (truth file {}, recent window {} weeks)",
            config.location,
            config.truth_csv_path.display(),
            config.recent_weeks
        );
        Ok(config)
    }
}
