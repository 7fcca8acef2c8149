//! Command Line Arguments
//! Global options and one subcommand per exploration view.

use crate::data::Metric;
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "COVID-19 data cleaning and metric explorer", long_about = None)]
pub struct Cli {
    /// Raw dataset CSV in the OWID layout
    #[arg(long, global = true, env = "COVID_TRACKER_DATA", value_hint = ValueHint::FilePath)]
    pub data: Option<PathBuf>,

    /// JSON settings file
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Locations to keep (comma separated)
    #[arg(long, global = true, value_delimiter = ',')]
    pub countries: Option<Vec<String>>,

    /// Keep every location, ignoring the configured country list
    #[arg(long, global = true, action = ArgAction::SetTrue, conflicts_with = "countries")]
    pub all_countries: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the cleaning pipeline and summarize or export the result
    Clean(CleanArgs),
    /// List the locations present in the cleaned table
    Locations,
    /// Trend of one metric for one location over a date range
    Trend(TrendArgs),
    /// Compare locations on one metric at a single date
    Compare(CompareArgs),
    /// Latest vaccination rate per location
    Map,
    /// Correlation between the dashboard metrics
    Heatmap,
    /// Automated summary of extremal values
    Insights,
}

#[derive(Parser, Debug)]
pub struct CleanArgs {
    /// Write the cleaned table to this CSV file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct TrendArgs {
    /// Location to plot (defaults to the first configured country)
    #[arg(long)]
    pub country: Option<String>,

    /// Metric column, e.g. total_cases or vaccination_rate
    #[arg(long)]
    pub metric: Option<Metric>,

    /// First date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

#[derive(Parser, Debug)]
pub struct CompareArgs {
    /// Metric column
    #[arg(long)]
    pub metric: Option<Metric>,

    /// Date to compare on (defaults to the latest date in the table)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
