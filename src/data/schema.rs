//! Dataset Schema Module
//! Column names of the OWID layout and the metric catalogue.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DATE: &str = "date";
pub const LOCATION: &str = "location";
pub const TOTAL_CASES: &str = "total_cases";
pub const NEW_CASES: &str = "new_cases";
pub const TOTAL_DEATHS: &str = "total_deaths";
pub const NEW_DEATHS: &str = "new_deaths";
pub const PEOPLE_VACCINATED: &str = "people_vaccinated";
pub const POPULATION: &str = "population";
pub const ICU_PATIENTS: &str = "icu_patients";
pub const DEATH_RATE: &str = "death_rate";
pub const VACCINATION_RATE: &str = "vaccination_rate";
pub const ICU_PER_MILLION: &str = "icu_per_million";

/// Columns the raw table must carry, in output order.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    DATE,
    LOCATION,
    TOTAL_CASES,
    NEW_CASES,
    TOTAL_DEATHS,
    NEW_DEATHS,
    PEOPLE_VACCINATED,
    POPULATION,
    ICU_PATIENTS,
];

/// Columns appended by the pipeline.
pub const DERIVED_COLUMNS: [&str; 3] = [DEATH_RATE, VACCINATION_RATE, ICU_PER_MILLION];

/// Metrics offered by the dashboard, also used for the correlation heatmap.
pub const DASHBOARD_METRICS: [Metric; 4] = [
    Metric::TotalCases,
    Metric::TotalDeaths,
    Metric::VaccinationRate,
    Metric::IcuPerMillion,
];

/// A numeric column of the cleaned table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TotalCases,
    NewCases,
    TotalDeaths,
    NewDeaths,
    PeopleVaccinated,
    Population,
    IcuPatients,
    DeathRate,
    VaccinationRate,
    IcuPerMillion,
}

impl Metric {
    pub const ALL: [Metric; 10] = [
        Metric::TotalCases,
        Metric::NewCases,
        Metric::TotalDeaths,
        Metric::NewDeaths,
        Metric::PeopleVaccinated,
        Metric::Population,
        Metric::IcuPatients,
        Metric::DeathRate,
        Metric::VaccinationRate,
        Metric::IcuPerMillion,
    ];

    /// Column name in the cleaned table.
    pub fn column(self) -> &'static str {
        match self {
            Metric::TotalCases => TOTAL_CASES,
            Metric::NewCases => NEW_CASES,
            Metric::TotalDeaths => TOTAL_DEATHS,
            Metric::NewDeaths => NEW_DEATHS,
            Metric::PeopleVaccinated => PEOPLE_VACCINATED,
            Metric::Population => POPULATION,
            Metric::IcuPatients => ICU_PATIENTS,
            Metric::DeathRate => DEATH_RATE,
            Metric::VaccinationRate => VACCINATION_RATE,
            Metric::IcuPerMillion => ICU_PER_MILLION,
        }
    }

    /// Human readable title, e.g. "Total Cases".
    pub fn title(self) -> String {
        self.column()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_derived(self) -> bool {
        matches!(
            self,
            Metric::DeathRate | Metric::VaccinationRate | Metric::IcuPerMillion
        )
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.column() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Metric::ALL.iter().map(|m| m.column()).collect();
                format!("unknown metric '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}
