//! CSV Data Loader Module
//! Handles loading the raw dataset and exporting cleaned tables using Polars.

use polars::prelude::*;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("CSV file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No data loaded")]
    NoData,
}

/// Holds the raw dataset for the lifetime of a session.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a CSV file using Polars.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }
        self.file_path = Some(file_path.to_path_buf());

        let path_str = file_path.to_string_lossy().to_string();
        debug!("reading {}", path_str);

        // Lenient read: malformed cells become nulls instead of aborting the load
        let df = LazyCsvReader::new(&path_str)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        info!(
            "loaded {} rows, {} columns from {}",
            df.height(),
            df.width(),
            path_str
        );
        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get sorted distinct non-null values of a column.
    pub fn get_unique_values(&self, column: &str) -> Vec<String> {
        let Some(df) = &self.df else {
            return Vec::new();
        };

        df.column(column)
            .and_then(|col| col.cast(&DataType::String))
            .ok()
            .map(|col| {
                let values: BTreeSet<String> = col
                    .as_materialized_series()
                    .str()
                    .map(|ca| ca.into_iter().flatten().map(|s| s.to_string()).collect())
                    .unwrap_or_default();
                values.into_iter().collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Result<&DataFrame, LoaderError> {
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// Write a frame as CSV with a header row.
    pub fn write_csv(df: &mut DataFrame, file_path: &Path) -> Result<(), LoaderError> {
        let mut file = File::create(file_path)?;
        CsvWriter::new(&mut file).include_header(true).finish(df)?;
        info!("wrote {} rows to {}", df.height(), file_path.display());
        Ok(())
    }
}
