//! Snapshot Module
//! Latest-date slice and per-location latest values of the cleaned table.

use crate::data::{CleanRecord, Metric};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Latest known value of each requested metric for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSnapshot {
    pub location: String,
    pub values: BTreeMap<Metric, Option<f64>>,
}

impl LocationSnapshot {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied().flatten()
    }
}

/// Maximum date present in the table.
pub fn latest_date(records: &[CleanRecord]) -> Option<NaiveDate> {
    records.iter().map(|r| r.date()).max()
}

/// Rows dated on the table's latest date, in table order.
pub fn latest_slice(records: &[CleanRecord]) -> Vec<&CleanRecord> {
    match latest_date(records) {
        Some(latest) => records.iter().filter(|r| r.date() == latest).collect(),
        None => Vec::new(),
    }
}

/// One snapshot per location, sorted by location name.
///
/// Each metric holds the last value in date order that is neither missing
/// nor NaN, so a location's snapshot may mix values from different dates.
pub fn latest_by_location(records: &[CleanRecord], metrics: &[Metric]) -> Vec<LocationSnapshot> {
    let mut grouped: BTreeMap<&str, Vec<&CleanRecord>> = BTreeMap::new();
    for record in records {
        grouped.entry(record.location()).or_default().push(record);
    }

    grouped
        .into_iter()
        .map(|(location, mut rows)| {
            rows.sort_by_key(|r| r.date());
            let values = metrics
                .iter()
                .map(|&metric| {
                    let last = rows.iter().rev().find_map(|r| r.known_value(metric));
                    (metric, last)
                })
                .collect();
            LocationSnapshot {
                location: location.to_string(),
                values,
            }
        })
        .collect()
}
