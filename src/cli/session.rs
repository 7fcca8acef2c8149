//! Session Module
//! Holds the raw dataset and the current cleaned table for one run.

use crate::data::{records_to_frame, schema, CleanRecord, CleaningPipeline, DataLoader};
use anyhow::{Context, Result};
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// Raw table loaded once, cleaned table re-derived on demand.
pub struct Session {
    loader: DataLoader,
    countries: Vec<String>,
    records: Vec<CleanRecord>,
}

impl Session {
    /// Load the raw CSV and clean it with the given country filter.
    pub fn open(data_path: &Path, countries: Vec<String>) -> Result<Self> {
        let mut loader = DataLoader::new();
        loader
            .load_csv(data_path)
            .with_context(|| format!("loading dataset {}", data_path.display()))?;
        Self::from_loader(loader, countries)
    }

    /// Start a session over an already loaded raw table.
    pub fn from_loader(loader: DataLoader, countries: Vec<String>) -> Result<Self> {
        let source = loader
            .get_file_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string());
        debug!(
            "raw table {}: {} rows, columns [{}]",
            source,
            loader.get_row_count(),
            loader.get_columns().join(", ")
        );

        let mut session = Self {
            loader,
            countries: Vec::new(),
            records: Vec::new(),
        };
        session.reclean(countries)?;
        Ok(session)
    }

    /// Re-derive the cleaned table with a different country filter.
    pub fn reclean(&mut self, countries: Vec<String>) -> Result<()> {
        let raw = self.loader.get_dataframe()?;
        if countries.is_empty() {
            debug!("cleaning all locations");
        } else {
            debug!("cleaning locations: {}", countries.join(", "));
        }
        for absent in self.absent_countries(&countries) {
            warn!("{} has no rows in the dataset", absent);
        }

        let records = CleaningPipeline::clean_records(raw, Some(countries.as_slice()))
            .context("cleaning dataset")?;
        info!(
            "cleaned table: {} of {} rows retained",
            records.len(),
            raw.height()
        );

        self.countries = countries;
        self.records = records;
        Ok(())
    }

    /// Requested countries that never appear in the raw table.
    pub fn absent_countries(&self, countries: &[String]) -> Vec<String> {
        let available: BTreeSet<String> = self
            .loader
            .get_unique_values(schema::LOCATION)
            .into_iter()
            .collect();
        countries
            .iter()
            .filter(|c| !available.contains(*c))
            .cloned()
            .collect()
    }

    pub fn records(&self) -> &[CleanRecord] {
        &self.records
    }

    /// Country filter the current table was derived with; empty means all.
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    /// Sorted distinct locations of the cleaned table.
    pub fn locations(&self) -> Vec<String> {
        let unique: BTreeSet<&str> = self.records.iter().map(|r| r.location()).collect();
        unique.into_iter().map(|s| s.to_string()).collect()
    }

    /// Rows retained per location, sorted by location.
    pub fn rows_per_location(&self) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.location()).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(location, n)| (location.to_string(), n))
            .collect()
    }

    /// The cleaned table as a Polars frame.
    pub fn cleaned_frame(&self) -> PolarsResult<DataFrame> {
        records_to_frame(&self.records)
    }

    /// Export the cleaned table as CSV.
    pub fn export_csv(&self, path: &Path) -> Result<()> {
        let mut frame = self.cleaned_frame()?;
        DataLoader::write_csv(&mut frame, path)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}
