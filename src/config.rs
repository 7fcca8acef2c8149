//! Settings Module
//! Session defaults, optionally overridden by a JSON settings file.

use crate::data::Metric;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// Defaults for every command of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub data_path: PathBuf,
    /// Locations to keep; empty keeps all.
    pub countries: Vec<String>,
    pub metric: Metric,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("owid-covid-data.csv"),
            countries: ["United States", "India", "Brazil", "Germany", "Kenya"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            metric: Metric::TotalCases,
            start_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or_default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file; absent fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_date > self.end_date {
            return Err(ConfigError::InvalidRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }
}
