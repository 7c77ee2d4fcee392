//! Snapshot export
//!
//! Writes the loaded snapshot as a single pretty-printed JSON document named
//! after the city and the export date.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::data::{AirQualitySnapshot, ForecastDay, HourlyEntry, Snapshot, WeatherSnapshot};

/// Errors that can occur while exporting
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The exported document
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument<'a> {
    pub city: &'a str,
    pub current: &'a WeatherSnapshot,
    pub forecast: &'a [ForecastDay],
    pub hourly: &'a [HourlyEntry],
    pub air_quality: &'a AirQualitySnapshot,
    pub exported_at: DateTime<Utc>,
}

impl<'a> ExportDocument<'a> {
    pub fn new(snapshot: &'a Snapshot, exported_at: DateTime<Utc>) -> Self {
        Self {
            city: snapshot.city(),
            current: &snapshot.current,
            forecast: &snapshot.forecast,
            hourly: &snapshot.hourly,
            air_quality: &snapshot.air_quality,
            exported_at,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// `weather-{city}-{YYYY-MM-DD}.json`, with characters that cannot appear in
/// a file name replaced by `_`
pub fn export_file_name(city: &str, date: NaiveDate) -> String {
    let safe_city: String = city
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("weather-{}-{}.json", safe_city, date.format("%Y-%m-%d"))
}

/// Writes the export document for `snapshot` into `dir` and returns its path
pub fn write_export(
    dir: &Path,
    snapshot: &Snapshot,
    now: DateTime<Utc>,
) -> Result<PathBuf, ExportError> {
    let document = ExportDocument::new(snapshot, now);
    let json = document.to_json()?;

    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(snapshot.city(), now.date_naive()));
    fs::write(&path, json)?;

    info!("Exported {} to {}", snapshot.city(), path.display());
    Ok(path)
}
