//! Comparison Chart Module
//! One metric across locations on a single date.

use crate::data::{CleanRecord, Metric};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub location: String,
    pub value: Option<f64>,
}

/// Chart data for a bar plot comparing locations.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonChart {
    pub title: String,
    pub metric: Metric,
    pub date: NaiveDate,
    pub bars: Vec<Bar>,
}

impl ComparisonChart {
    /// One bar per row dated `date`, in table order.
    pub fn build(records: &[CleanRecord], metric: Metric, date: NaiveDate) -> Self {
        let bars = records
            .iter()
            .filter(|r| r.date() == date)
            .map(|r| Bar {
                location: r.location().to_string(),
                value: r.known_value(metric),
            })
            .collect();

        Self {
            title: format!("Comparison on {}", date.format("%Y-%m-%d")),
            metric,
            date,
            bars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CleaningPipeline, Observation};

    fn record(location: &str, d: u32, vaccinated: Option<f64>) -> CleanRecord {
        CleaningPipeline::derive(Observation {
            date: NaiveDate::from_ymd_opt(2022, 1, d).unwrap(),
            location: location.to_string(),
            total_cases: Some(1.0),
            new_cases: None,
            total_deaths: None,
            new_deaths: None,
            people_vaccinated: vaccinated,
            population: Some(100.0),
            icu_patients: None,
        })
    }

    #[test]
    fn compares_locations_on_one_date() {
        let records = vec![
            record("India", 1, Some(10.0)),
            record("India", 2, Some(20.0)),
            record("Kenya", 2, None),
            record("Germany", 2, Some(80.0)),
        ];
        let date = NaiveDate::from_ymd_opt(2022, 1, 2).unwrap();
        let chart = ComparisonChart::build(&records, Metric::VaccinationRate, date);

        assert_eq!(chart.title, "Comparison on 2022-01-02");
        assert_eq!(
            chart.bars,
            vec![
                Bar { location: "India".into(), value: Some(0.2) },
                Bar { location: "Kenya".into(), value: None },
                Bar { location: "Germany".into(), value: Some(0.8) },
            ]
        );
    }
}
