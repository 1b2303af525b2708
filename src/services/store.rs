// src/services/store.rs
use chrono::{DateTime, Utc};
use csv::{Reader, Writer};
use log::{error, info, warn};
use serde::Deserialize;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::error::{EvalError, Result};
use crate::models::{WeekEntry, WeeklyTruthSeries};

const HEADER: [&str; 4] = ["", "EpiWeek", "NewCases", "NewDeaths"];

#[derive(Debug, Deserialize)]
struct PersistedRow {
    #[serde(rename = "")]
    index: usize,
    #[serde(rename = "EpiWeek")]
    epi_week: f64,
    #[serde(rename = "NewCases")]
    new_cases: f64,
    #[serde(rename = "NewDeaths")]
    new_deaths: f64,
}

/// Column sums may have been written as floats (`1200.0`); only integral values are accepted.
fn integral(column: &str, row: usize, value: f64) -> Result<i64> {
    if !value.is_finite() || value.fract() != 0.0 || value.abs() >= i64::MAX as f64 {
        return Err(EvalError::CorruptReferenceData(format!(
            "row {} has non-integer {} value {}",
            row, column, value
        )));
    }
    Ok(value as i64)
}

/// Writes the series as `,EpiWeek,NewCases,NewDeaths` with a 0-based index column.
pub fn write_series<W: Write>(writer: W, series: &WeeklyTruthSeries) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(HEADER)?;
    for (idx, week) in series.weeks.iter().enumerate() {
        wtr.write_record(&[
            idx.to_string(),
            week.epi_week.to_string(),
            week.new_cases.to_string(),
            week.new_deaths.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Reads a series written by [`write_series`]; rows must be indexed `0..n` in order.
pub fn read_series<R: Read>(reader: R) -> Result<WeeklyTruthSeries> {
    let mut rdr = Reader::from_reader(reader);
    let mut weeks = Vec::new();

    for (expected, result) in rdr.deserialize::<PersistedRow>().enumerate() {
        let row = result.map_err(|e| EvalError::CorruptReferenceData(e.to_string()))?;
        if row.index != expected {
            return Err(EvalError::CorruptReferenceData(format!(
                "row {} carries index {}",
                expected, row.index
            )));
        }
        let epi_week = integral("EpiWeek", expected, row.epi_week)?;
        let epi_week = u32::try_from(epi_week)
            .ok()
            .filter(|w| (1..=53).contains(w))
            .ok_or_else(|| {
                EvalError::CorruptReferenceData(format!("row {} has epi week {}", expected, epi_week))
            })?;
        weeks.push(WeekEntry {
            epi_week,
            new_cases: integral("NewCases", expected, row.new_cases)?,
            new_deaths: integral("NewDeaths", expected, row.new_deaths)?,
        });
    }

    Ok(WeeklyTruthSeries::new(weeks))
}

struct Snapshot {
    series: Arc<WeeklyTruthSeries>,
    refreshed_at: DateTime<Utc>,
}

/// Persisted weekly ground truth plus the in-memory copy served to evaluations.
///
/// Replacement swaps the whole `Arc`, so readers holding an older snapshot keep
/// a consistent series.
pub struct TruthStore {
    path: PathBuf,
    current: RwLock<Option<Snapshot>>,
}

impl TruthStore {
    /// Opens the store at `path`. A missing file leaves the store empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = TruthStore {
            path: path.into(),
            current: RwLock::new(None),
        };

        match store.reload() {
            Ok(()) => {}
            Err(EvalError::MissingReferenceData(_)) => {
                warn!("No ground-truth file at {}, store starts empty", store.path.display());
            }
            Err(e) => return Err(e),
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-reads the file from disk into the in-memory snapshot.
    pub fn reload(&self) -> Result<()> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(EvalError::MissingReferenceData(self.path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let refreshed_at = file
            .metadata()
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());
        let series = read_series(file)?;
        info!("Loaded {} weeks of ground truth from {}", series.len(), self.path.display());

        self.swap(series, refreshed_at);
        Ok(())
    }

    /// Current series, or `MissingReferenceData` if nothing has been loaded.
    pub fn snapshot(&self) -> Result<Arc<WeeklyTruthSeries>> {
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard
            .as_ref()
            .map(|s| Arc::clone(&s.series))
            .ok_or_else(|| EvalError::MissingReferenceData(self.path.display().to_string()))
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.as_ref().map(|s| s.refreshed_at)
    }

    /// Persists `series` over the previous file, then publishes it.
    pub fn replace(&self, series: WeeklyTruthSeries) -> Result<()> {
        let tmp_path = self.path.with_extension("csv.tmp");
        let write_result = fs::File::create(&tmp_path)
            .map_err(EvalError::from)
            .and_then(|file| write_series(file, &series))
            .and_then(|()| fs::rename(&tmp_path, &self.path).map_err(EvalError::from));

        if let Err(e) = write_result {
            error!("Failed to persist ground truth to {}: {}", self.path.display(), e);
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        info!("Persisted {} weeks of ground truth to {}", series.len(), self.path.display());
        self.swap(series, Utc::now());
        Ok(())
    }

    fn swap(&self, series: WeeklyTruthSeries, refreshed_at: DateTime<Utc>) {
        let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(Snapshot {
            series: Arc::new(series),
            refreshed_at,
        });
    }
}
