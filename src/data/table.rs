//! Typed Table Module
//! Row types of the raw and cleaned tables and their conversion from/to Polars frames.

use super::pipeline::PipelineError;
use super::schema::{self, Metric, REQUIRED_COLUMNS};
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::HashSet;

/// One location on one date, restricted to the projected columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub location: String,
    pub total_cases: Option<f64>,
    pub new_cases: Option<f64>,
    pub total_deaths: Option<f64>,
    pub new_deaths: Option<f64>,
    pub people_vaccinated: Option<f64>,
    pub population: Option<f64>,
    pub icu_patients: Option<f64>,
}

impl Observation {
    /// Value of a source column; derived metrics are not stored here.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::TotalCases => self.total_cases,
            Metric::NewCases => self.new_cases,
            Metric::TotalDeaths => self.total_deaths,
            Metric::NewDeaths => self.new_deaths,
            Metric::PeopleVaccinated => self.people_vaccinated,
            Metric::Population => self.population,
            Metric::IcuPatients => self.icu_patients,
            Metric::DeathRate | Metric::VaccinationRate | Metric::IcuPerMillion => None,
        }
    }
}

/// A row of the cleaned table: the observation after imputation plus derived ratios.
///
/// Derived ratios are `NaN` when undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    pub observation: Observation,
    pub death_rate: f64,
    pub vaccination_rate: f64,
    pub icu_per_million: f64,
}

impl CleanRecord {
    pub fn date(&self) -> NaiveDate {
        self.observation.date
    }

    pub fn location(&self) -> &str {
        &self.observation.location
    }

    /// Raw value of any metric. Derived metrics may be `Some(NaN)`.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::DeathRate => Some(self.death_rate),
            Metric::VaccinationRate => Some(self.vaccination_rate),
            Metric::IcuPerMillion => Some(self.icu_per_million),
            _ => self.observation.value(metric),
        }
    }

    /// Value of a metric with NaN treated as missing.
    pub fn known_value(&self, metric: Metric) -> Option<f64> {
        self.value(metric).filter(|v| !v.is_nan())
    }
}

/// Extract the projected columns of a raw frame as typed observations.
///
/// Extra columns are ignored. Fails if any required column is absent,
/// a date cannot be parsed or a location is missing.
pub fn read_observations(df: &DataFrame) -> Result<Vec<Observation>, PipelineError> {
    let present: HashSet<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !present.contains(**name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::MissingColumns(missing));
    }

    let dates = string_values(df, schema::DATE)?;
    let locations = string_values(df, schema::LOCATION)?;
    let total_cases = float_values(df, schema::TOTAL_CASES)?;
    let new_cases = float_values(df, schema::NEW_CASES)?;
    let total_deaths = float_values(df, schema::TOTAL_DEATHS)?;
    let new_deaths = float_values(df, schema::NEW_DEATHS)?;
    let people_vaccinated = float_values(df, schema::PEOPLE_VACCINATED)?;
    let population = float_values(df, schema::POPULATION)?;
    let icu_patients = float_values(df, schema::ICU_PATIENTS)?;

    let mut observations = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let raw_date = dates[row].as_deref();
        let date = raw_date
            .and_then(parse_date)
            .ok_or_else(|| PipelineError::InvalidDate {
                row,
                value: raw_date.unwrap_or_default().to_string(),
            })?;
        let location = locations[row]
            .clone()
            .ok_or(PipelineError::MissingLocation { row })?;

        observations.push(Observation {
            date,
            location,
            total_cases: total_cases[row],
            new_cases: new_cases[row],
            total_deaths: total_deaths[row],
            new_deaths: new_deaths[row],
            people_vaccinated: people_vaccinated[row],
            population: population[row],
            icu_patients: icu_patients[row],
        });
    }

    Ok(observations)
}

/// Build the cleaned frame: the nine source columns followed by the derived ones.
pub fn records_to_frame(records: &[CleanRecord]) -> PolarsResult<DataFrame> {
    let dates: Vec<NaiveDate> = records.iter().map(|r| r.date()).collect();
    let locations: Vec<String> = records.iter().map(|r| r.location().to_string()).collect();

    let mut columns = vec![
        Column::new(schema::DATE.into(), dates),
        Column::new(schema::LOCATION.into(), locations),
    ];

    for metric in Metric::ALL {
        let column = if metric.is_derived() {
            let values: Vec<f64> = records
                .iter()
                .map(|r| r.value(metric).unwrap_or(f64::NAN))
                .collect();
            Column::new(metric.column().into(), values)
        } else {
            let values: Vec<Option<f64>> = records.iter().map(|r| r.value(metric)).collect();
            Column::new(metric.column().into(), values)
        };
        columns.push(column);
    }

    DataFrame::new(columns)
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn string_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect();
    Ok(values)
}

/// Non-strict cast to Float64; unparsable entries and NaN become missing.
fn float_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    let values = column
        .as_materialized_series()
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(values)
}
