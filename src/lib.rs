//! COVID-19 Tracker - Data cleaning & metric exploration
//!
//! Loads the OWID country/day dataset, forward-fills sparse counts per
//! location, derives ratio metrics and builds chart data and insight text
//! from the cleaned table.

pub mod charts;
pub mod cli;
pub mod config;
pub mod data;
pub mod insights;
pub mod stats;
