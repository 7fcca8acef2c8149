//! Statistics Calculator Module
//! Descriptive statistics of a plotted metric series.

use serde::Serialize;

/// Summary of one series of metric values.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for SeriesStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Handles statistical calculations over metric series.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics, ignoring non-finite values.
    pub fn describe(values: &[f64]) -> SeriesStats {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let n = finite.len();
        if n == 0 {
            return SeriesStats::default();
        }

        let mut sorted = finite.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = finite.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        // Sample variance (n - 1)
        let variance = if n > 1 {
            finite.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };

        SeriesStats {
            count: n,
            mean,
            median,
            std: variance.sqrt(),
            min: sorted[0],
            max: sorted[n - 1],
        }
    }
}
