//! Choropleth Module
//! Latest vaccination rate per country, keyed by country name.

use crate::data::{CleanRecord, Metric};
use crate::stats;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub location: String,
    pub value: Option<f64>,
}

/// Map data built from the latest-date slice.
#[derive(Debug, Clone, Serialize)]
pub struct ChoroplethData {
    pub title: String,
    pub metric: Metric,
    pub date: Option<NaiveDate>,
    pub regions: Vec<Region>,
}

impl ChoroplethData {
    pub fn build(records: &[CleanRecord]) -> Self {
        let metric = Metric::VaccinationRate;
        let regions = stats::latest_slice(records)
            .into_iter()
            .map(|r| Region {
                location: r.location().to_string(),
                value: r.known_value(metric),
            })
            .collect();

        Self {
            title: "Global Vaccination Rates".to_string(),
            metric,
            date: stats::latest_date(records),
            regions,
        }
    }
}
