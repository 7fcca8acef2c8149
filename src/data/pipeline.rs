//! Cleaning Pipeline Module
//! Projects, filters, forward-fills and derives ratio metrics per location.

use super::table::{self, CleanRecord, Observation};
use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("Invalid date {value:?} in row {row}")]
    InvalidDate { row: usize, value: String },
    #[error("Missing location in row {row}")]
    MissingLocation { row: usize },
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Last reported figure per forward-filled column of one location.
#[derive(Default)]
struct LastSeen {
    total_cases: Option<f64>,
    total_deaths: Option<f64>,
    people_vaccinated: Option<f64>,
    icu_patients: Option<f64>,
}

impl LastSeen {
    /// Fill the gaps of `row` from earlier reports, then remember its values.
    fn carry(&mut self, row: &mut Observation) {
        Self::carry_one(&mut self.total_cases, &mut row.total_cases);
        Self::carry_one(&mut self.total_deaths, &mut row.total_deaths);
        Self::carry_one(&mut self.people_vaccinated, &mut row.people_vaccinated);
        Self::carry_one(&mut self.icu_patients, &mut row.icu_patients);
    }

    fn carry_one(last: &mut Option<f64>, value: &mut Option<f64>) {
        match *value {
            Some(v) => *last = Some(v),
            None => *value = *last,
        }
    }
}

/// Turns the raw dataset into the cleaned table every view consumes.
pub struct CleaningPipeline;

impl CleaningPipeline {
    /// Clean a raw frame and return the cleaned frame.
    ///
    /// Output columns: the nine required columns followed by
    /// `death_rate`, `vaccination_rate` and `icu_per_million`.
    pub fn clean(raw: &DataFrame, countries: Option<&[String]>) -> Result<DataFrame, PipelineError> {
        let records = Self::clean_records(raw, countries)?;
        Ok(table::records_to_frame(&records)?)
    }

    /// Clean a raw frame into typed records.
    pub fn clean_records(
        raw: &DataFrame,
        countries: Option<&[String]>,
    ) -> Result<Vec<CleanRecord>, PipelineError> {
        let observations = table::read_observations(raw)?;
        Ok(Self::clean_observations(observations, countries))
    }

    /// Core pass over already projected rows.
    ///
    /// An absent or empty `countries` list keeps every location.
    pub fn clean_observations(
        observations: Vec<Observation>,
        countries: Option<&[String]>,
    ) -> Vec<CleanRecord> {
        let wanted: Option<HashSet<&str>> = countries
            .filter(|c| !c.is_empty())
            .map(|c| c.iter().map(|s| s.as_str()).collect());

        let mut rows: Vec<Observation> = observations
            .into_iter()
            .filter(|row| {
                wanted
                    .as_ref()
                    .map_or(true, |set| set.contains(row.location.as_str()))
            })
            .collect();

        Self::forward_fill(&mut rows);

        rows.into_iter()
            .filter(|row| row.total_cases.is_some())
            .map(Self::derive)
            .collect()
    }

    /// Forward-fill within each location, walking its rows in date order.
    fn forward_fill(rows: &mut [Observation]) {
        let mut by_location: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, row) in rows.iter().enumerate() {
            by_location
                .entry(row.location.clone())
                .or_default()
                .push(idx);
        }

        for indices in by_location.values_mut() {
            // stable: same-date rows keep input order
            indices.sort_by_key(|&idx| rows[idx].date);
            let mut last = LastSeen::default();
            for &idx in indices.iter() {
                last.carry(&mut rows[idx]);
            }
        }
    }

    /// Attach the derived ratios to an imputed row.
    pub fn derive(observation: Observation) -> CleanRecord {
        let death_rate = ratio(observation.total_deaths, observation.total_cases);
        let vaccination_rate = ratio(observation.people_vaccinated, observation.population);
        let icu_per_million = ratio(
            observation.icu_patients,
            observation.population.map(|p| p / 1e6),
        );

        CleanRecord {
            observation,
            death_rate,
            vaccination_rate,
            icu_per_million,
        }
    }
}

/// `NaN` when either side is missing or the denominator is zero.
fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> f64 {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => n / d,
        _ => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::Metric;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, d).unwrap()
    }

    fn obs(location: &str, d: u32) -> Observation {
        Observation {
            date: day(d),
            location: location.to_string(),
            total_cases: None,
            new_cases: None,
            total_deaths: None,
            new_deaths: None,
            people_vaccinated: None,
            population: None,
            icu_patients: None,
        }
    }

    fn raw_frame(rows: &[Observation]) -> DataFrame {
        let col = |name: &str, f: fn(&Observation) -> Option<f64>| {
            Column::new(name.into(), rows.iter().map(f).collect::<Vec<_>>())
        };
        DataFrame::new(vec![
            Column::new(
                "date".into(),
                rows.iter()
                    .map(|r| r.date.format("%Y-%m-%d").to_string())
                    .collect::<Vec<_>>(),
            ),
            Column::new(
                "location".into(),
                rows.iter().map(|r| r.location.clone()).collect::<Vec<_>>(),
            ),
            col("total_cases", |r| r.total_cases),
            col("new_cases", |r| r.new_cases),
            col("total_deaths", |r| r.total_deaths),
            col("new_deaths", |r| r.new_deaths),
            col("people_vaccinated", |r| r.people_vaccinated),
            col("population", |r| r.population),
            col("icu_patients", |r| r.icu_patients),
            Column::new("continent".into(), vec!["Europe"; rows.len()]),
        ])
        .unwrap()
    }

    fn multi_country_rows() -> Vec<Observation> {
        let mut rows = Vec::new();
        for (i, location) in ["Germany", "Kenya", "India"].iter().enumerate() {
            for d in 1..=4u32 {
                let mut row = obs(location, d);
                row.population = Some(1_000_000.0 * (i + 1) as f64);
                if d != 3 {
                    row.total_cases = Some(100.0 * d as f64);
                    row.total_deaths = Some(d as f64);
                }
                if *location == "Kenya" && d == 1 {
                    row.total_cases = None;
                }
                if d % 2 == 0 {
                    row.people_vaccinated = Some(1000.0 * d as f64);
                }
                rows.push(row);
            }
        }
        rows
    }

    #[test]
    fn testland_scenario() {
        let mut first = obs("Testland", 1);
        first.total_cases = Some(100.0);
        first.population = Some(1000.0);
        let mut second = obs("Testland", 2);
        second.people_vaccinated = Some(50.0);
        second.population = Some(1000.0);

        let cleaned = CleaningPipeline::clean_observations(vec![first, second], None);
        assert_eq!(cleaned.len(), 2);

        assert_eq!(cleaned[0].observation.total_cases, Some(100.0));
        assert_eq!(cleaned[0].observation.people_vaccinated, None);
        assert!(cleaned[0].vaccination_rate.is_nan());

        assert_eq!(cleaned[1].observation.total_cases, Some(100.0));
        assert_eq!(cleaned[1].observation.people_vaccinated, Some(50.0));
        assert_eq!(cleaned[1].vaccination_rate, 0.05);
    }

    #[test]
    fn every_retained_row_has_total_cases() {
        let cleaned = CleaningPipeline::clean_observations(multi_country_rows(), None);
        assert!(cleaned.iter().all(|r| r.observation.total_cases.is_some()));
        // Kenya day 1 has no prior case count and is dropped
        assert_eq!(cleaned.len(), 11);
        assert!(!cleaned
            .iter()
            .any(|r| r.location() == "Kenya" && r.date() == day(1)));
    }

    #[test]
    fn forward_fill_never_crosses_locations() {
        let mut a = obs("A", 1);
        a.total_cases = Some(500.0);
        a.icu_patients = Some(7.0);
        let mut b = obs("B", 2);
        b.total_cases = Some(1.0);
        let mut b_gap = obs("B", 3);
        b_gap.total_cases = Some(2.0);
        let mut a_gap = obs("A", 3);
        a_gap.total_deaths = Some(3.0);

        let cleaned = CleaningPipeline::clean_observations(vec![a, b, b_gap, a_gap], None);
        let b_rows: Vec<&CleanRecord> = cleaned.iter().filter(|r| r.location() == "B").collect();
        assert!(b_rows.iter().all(|r| r.observation.icu_patients.is_none()));

        let a_late = cleaned
            .iter()
            .find(|r| r.location() == "A" && r.date() == day(3))
            .unwrap();
        assert_eq!(a_late.observation.total_cases, Some(500.0));
        assert_eq!(a_late.observation.icu_patients, Some(7.0));
    }

    #[test]
    fn forward_fill_follows_dates_not_input_order() {
        // Day 2 arrives before day 1: day 2 must not feed day 1.
        let mut late = obs("X", 2);
        late.total_cases = Some(20.0);
        let mut early = obs("X", 1);
        early.total_cases = Some(10.0);
        early.people_vaccinated = Some(5.0);
        let mut gap = obs("X", 3);
        gap.icu_patients = Some(1.0);

        let cleaned = CleaningPipeline::clean_observations(vec![late, gap, early], None);
        // output keeps input order
        let dates: Vec<NaiveDate> = cleaned.iter().map(|r| r.date()).collect();
        assert_eq!(dates, vec![day(2), day(3), day(1)]);

        assert_eq!(cleaned[0].observation.people_vaccinated, Some(5.0));
        assert_eq!(cleaned[1].observation.total_cases, Some(20.0));
        assert_eq!(cleaned[1].observation.people_vaccinated, Some(5.0));
        assert_eq!(cleaned[2].observation.icu_patients, None);
    }

    #[test]
    fn untracked_columns_are_not_filled() {
        let mut first = obs("X", 1);
        first.total_cases = Some(1.0);
        first.new_cases = Some(1.0);
        first.population = Some(10.0);
        let mut second = obs("X", 2);
        second.total_cases = Some(2.0);

        let cleaned = CleaningPipeline::clean_observations(vec![first, second], None);
        assert_eq!(cleaned[1].observation.new_cases, None);
        assert_eq!(cleaned[1].observation.population, None);
        assert!(cleaned[1].vaccination_rate.is_nan());
    }

    #[test]
    fn degenerate_denominators_yield_nan() {
        let mut zero_cases = obs("Z", 1);
        zero_cases.total_cases = Some(0.0);
        zero_cases.total_deaths = Some(0.0);
        zero_cases.population = Some(0.0);
        zero_cases.people_vaccinated = Some(3.0);
        zero_cases.icu_patients = Some(2.0);

        let record = CleaningPipeline::derive(zero_cases);
        assert!(record.death_rate.is_nan());
        assert!(record.vaccination_rate.is_nan());
        assert!(record.icu_per_million.is_nan());
    }

    #[test]
    fn icu_per_million_scales_by_population() {
        let mut row = obs("Y", 1);
        row.total_cases = Some(10.0);
        row.icu_patients = Some(50.0);
        row.population = Some(2_000_000.0);
        assert_eq!(CleaningPipeline::derive(row).icu_per_million, 25.0);
    }

    #[test]
    fn vaccination_rate_within_unit_interval_for_valid_rows() {
        let cleaned = CleaningPipeline::clean_observations(multi_country_rows(), None);
        for record in &cleaned {
            let o = &record.observation;
            if let (Some(v), Some(p)) = (o.people_vaccinated, o.population) {
                if p > 0.0 && v <= p {
                    assert!((0.0..=1.0).contains(&record.vaccination_rate));
                }
            }
        }
    }

    #[test]
    fn country_filter_matches_unfiltered_subset() {
        let rows = multi_country_rows();
        let all = CleaningPipeline::clean_observations(rows.clone(), None);
        let countries = vec!["Germany".to_string()];
        let germany = CleaningPipeline::clean_observations(rows, Some(countries.as_slice()));

        assert!(germany.iter().all(|r| r.location() == "Germany"));
        let expected: Vec<&Observation> = all
            .iter()
            .filter(|r| r.location() == "Germany")
            .map(|r| &r.observation)
            .collect();
        assert_eq!(germany.len(), expected.len());
        assert_eq!(
            germany.iter().map(|r| &r.observation).collect::<Vec<_>>(),
            expected
        );
    }

    #[test]
    fn empty_or_unknown_country_filter() {
        let rows = multi_country_rows();
        let all = CleaningPipeline::clean_observations(rows.clone(), None);
        let none: Vec<String> = Vec::new();
        let empty = CleaningPipeline::clean_observations(rows.clone(), Some(none.as_slice()));
        assert_eq!(all.len(), empty.len());

        let atlantis = vec!["Atlantis".to_string()];
        let unknown = CleaningPipeline::clean_observations(rows, Some(atlantis.as_slice()));
        assert!(unknown.is_empty());
    }

    #[test]
    fn cleaning_is_idempotent_bit_for_bit() {
        let raw = raw_frame(&multi_country_rows());
        let countries = vec!["Germany".to_string(), "India".to_string()];
        let first = CleaningPipeline::clean_records(&raw, Some(countries.as_slice())).unwrap();
        let second = CleaningPipeline::clean_records(&raw, Some(countries.as_slice())).unwrap();

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.observation, b.observation);
            for metric in [Metric::DeathRate, Metric::VaccinationRate, Metric::IcuPerMillion] {
                let bits = |r: &CleanRecord| r.value(metric).map(f64::to_bits);
                assert_eq!(bits(a), bits(b));
            }
        }
    }

    #[test]
    fn clean_frame_drops_extra_columns_and_keeps_input() {
        let raw = raw_frame(&multi_country_rows());
        let before = raw.height();
        let cleaned = CleaningPipeline::clean(&raw, None).unwrap();

        assert_eq!(raw.height(), before);
        assert!(raw.column("continent").is_ok());
        assert!(cleaned.column("continent").is_err());
        assert_eq!(cleaned.width(), 12);
        assert_eq!(cleaned.height(), 11);
        assert_eq!(cleaned.column("total_cases").unwrap().null_count(), 0);
    }

    #[test]
    fn missing_column_aborts() {
        let raw = raw_frame(&multi_country_rows()).drop("icu_patients").unwrap();
        let err = CleaningPipeline::clean(&raw, None).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumns(ref c) if c == &["icu_patients"]));
        assert_eq!(err.to_string(), "Missing required columns: icu_patients");
    }

    #[test]
    fn invalid_date_aborts_without_partial_result() {
        let mut raw = raw_frame(&multi_country_rows());
        let mut dates: Vec<String> = (0..raw.height()).map(|_| "2021-01-01".to_string()).collect();
        dates[5] = "not-a-date".to_string();
        raw.with_column(Column::new("date".into(), dates)).unwrap();

        let result = CleaningPipeline::clean(&raw, None);
        match result {
            Err(PipelineError::InvalidDate { row, value }) => {
                assert_eq!(row, 5);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("expected invalid date, got {:?}", other.map(|df| df.height())),
        }
    }
}
