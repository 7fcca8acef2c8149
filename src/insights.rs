//! Insights Module
//! Automated extremal-value statements over the cleaned table.

use crate::data::{CleanRecord, Metric};
use crate::stats;
use serde::Serialize;

/// Location holding the largest value of a metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extremum {
    pub location: String,
    pub value: f64,
}

/// Largest non-NaN value of `metric`; the first row wins ties.
///
/// NaN rows are skipped rather than reported as an extreme.
pub fn highest(rows: &[&CleanRecord], metric: Metric) -> Option<Extremum> {
    let mut best: Option<Extremum> = None;
    for row in rows {
        let Some(value) = row.known_value(metric) else {
            continue;
        };
        if best.as_ref().map_or(true, |b| value > b.value) {
            best = Some(Extremum {
                location: row.location().to_string(),
                value,
            });
        }
    }
    best
}

/// Generate the four summary statements.
pub fn generate_insights(records: &[CleanRecord]) -> Vec<String> {
    let latest = stats::latest_slice(records);
    let correlation = vaccination_death_correlation(records);

    vec![
        format!(
            "1. Highest vaccination rate: {}",
            describe(highest(&latest, Metric::VaccinationRate), percent)
        ),
        format!(
            "2. Highest death rate: {}",
            describe(highest(&latest, Metric::DeathRate), percent)
        ),
        format!(
            "3. Most ICU patients per million: {}",
            describe(highest(&latest, Metric::IcuPerMillion), |v| format!("{:.1}", v))
        ),
        format!(
            "4. Vaccination rates correlate {} with death rates (r = {:.2})",
            direction(correlation),
            correlation
        ),
    ]
}

/// Pearson r between per-location latest vaccination and death rates.
pub fn vaccination_death_correlation(records: &[CleanRecord]) -> f64 {
    let snapshots =
        stats::latest_by_location(records, &[Metric::VaccinationRate, Metric::DeathRate]);
    let column = |metric: Metric| -> Vec<f64> {
        snapshots
            .iter()
            .map(|s| s.get(metric).unwrap_or(f64::NAN))
            .collect()
    };
    stats::pearson(&column(Metric::VaccinationRate), &column(Metric::DeathRate))
}

fn describe(extremum: Option<Extremum>, fmt: impl Fn(f64) -> String) -> String {
    match extremum {
        Some(e) => format!("{} ({})", e.location, fmt(e.value)),
        None => "n/a".to_string(),
    }
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn direction(r: f64) -> &'static str {
    if r.is_nan() {
        "undetermined"
    } else if r < 0.0 {
        "negatively"
    } else {
        "positively"
    }
}
