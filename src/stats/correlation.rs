//! Correlation Module
//! Pearson correlation between metrics across locations.

use super::snapshot::LocationSnapshot;
use crate::data::Metric;
use serde::Serialize;
use statrs::statistics::Statistics;

/// Pearson correlation over the pairs where both values are finite.
///
/// Returns NaN with fewer than two pairs or when either side is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(a, b)| (*a, *b))
        .unzip();

    if xs.len() < 2 {
        return f64::NAN;
    }

    let covariance = Statistics::covariance(xs.iter(), ys.iter());
    let denominator = Statistics::std_dev(xs.iter()) * Statistics::std_dev(ys.iter());
    if denominator == 0.0 {
        return f64::NAN;
    }
    covariance / denominator
}

/// Symmetric correlation matrix between a set of metrics.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub metrics: Vec<Metric>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Correlate metrics using one latest value per location.
    pub fn from_snapshots(snapshots: &[LocationSnapshot], metrics: &[Metric]) -> Self {
        let column = |metric: Metric| -> Vec<f64> {
            snapshots
                .iter()
                .map(|s| s.get(metric).unwrap_or(f64::NAN))
                .collect()
        };
        let columns: Vec<Vec<f64>> = metrics.iter().map(|&m| column(m)).collect();

        let values = columns
            .iter()
            .map(|x| columns.iter().map(|y| pearson(x, y)).collect())
            .collect();

        Self {
            metrics: metrics.to_vec(),
            values,
        }
    }

    /// Coefficient between two metrics, `None` if either is not in the matrix.
    pub fn get(&self, a: Metric, b: Metric) -> Option<f64> {
        let i = self.metrics.iter().position(|&m| m == a)?;
        let j = self.metrics.iter().position(|&m| m == b)?;
        Some(self.values[i][j])
    }
}
