//! Trend Chart Module
//! Time series of one metric for one location over a date range.

use crate::data::{CleanRecord, Metric};
use crate::stats::{SeriesStats, StatsCalculator};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Chart data for a line plot of `metric` in `location`.
#[derive(Debug, Clone, Serialize)]
pub struct TrendChart {
    pub title: String,
    pub location: String,
    pub metric: Metric,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub points: Vec<TrendPoint>,
    pub stats: SeriesStats,
}

impl TrendChart {
    /// Collect the points of `location` dated within `start..=end`.
    ///
    /// Rows without a value (missing or NaN) are left out of the line.
    pub fn build(
        records: &[CleanRecord],
        location: &str,
        metric: Metric,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        let mut points: Vec<TrendPoint> = records
            .iter()
            .filter(|r| r.location() == location && r.date() >= start && r.date() <= end)
            .filter_map(|r| {
                r.known_value(metric).map(|value| TrendPoint {
                    date: r.date(),
                    value,
                })
            })
            .collect();
        points.sort_by_key(|p| p.date);

        let values: Vec<f64> = points.iter().map(|p| p.value).collect();

        Self {
            title: format!("{} in {}", metric.title(), location),
            location: location.to_string(),
            metric,
            start,
            end,
            stats: StatsCalculator::describe(&values),
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
