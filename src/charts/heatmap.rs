//! Heatmap Module
//! Correlation of the dashboard metrics over per-location latest values.

use crate::data::schema::DASHBOARD_METRICS;
use crate::data::CleanRecord;
use crate::stats::{self, CorrelationMatrix};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct HeatmapData {
    pub title: String,
    pub locations: usize,
    pub matrix: CorrelationMatrix,
}

impl HeatmapData {
    pub fn build(records: &[CleanRecord]) -> Self {
        let snapshots = stats::latest_by_location(records, &DASHBOARD_METRICS);
        Self {
            title: "COVID-19 Metrics Correlation".to_string(),
            locations: snapshots.len(),
            matrix: CorrelationMatrix::from_snapshots(&snapshots, &DASHBOARD_METRICS),
        }
    }
}
