//! Command Dispatch
//! Resolves settings, opens the session and runs one subcommand.

use super::args::{CleanArgs, Cli, Command, CompareArgs, OutputFormat, TrendArgs};
use super::output::{self, CleanSummary, InsightReport, LocationList};
use super::session::Session;
use crate::charts::{ChoroplethData, ComparisonChart, HeatmapData, TrendChart};
use crate::config::{ConfigError, Settings};
use crate::insights;
use crate::stats;
use anyhow::{anyhow, Result};
use tracing::{info, warn};

/// Settings file first, then command line overrides.
pub fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    if let Some(data) = &cli.data {
        settings.data_path = data.clone();
    }
    if cli.all_countries {
        settings.countries.clear();
    } else if let Some(countries) = &cli.countries {
        settings.countries = countries.clone();
    }
    Ok(settings)
}

pub fn run(cli: Cli) -> Result<()> {
    let settings = resolve_settings(&cli)?;
    info!("dataset {}", settings.data_path.display());
    let session = Session::open(&settings.data_path, settings.countries.clone())?;
    let format = cli.format;

    match cli.command {
        Command::Clean(args) => handle_clean(&session, args, format),
        Command::Locations => output::emit(
            &LocationList {
                locations: session.locations(),
            },
            format,
        ),
        Command::Trend(args) => handle_trend(&session, &settings, args, format),
        Command::Compare(args) => handle_compare(&session, &settings, args, format),
        Command::Map => output::emit(&ChoroplethData::build(session.records()), format),
        Command::Heatmap => output::emit(&HeatmapData::build(session.records()), format),
        Command::Insights => output::emit(
            &InsightReport {
                insights: insights::generate_insights(session.records()),
            },
            format,
        ),
    }
}

fn handle_clean(session: &Session, args: CleanArgs, format: OutputFormat) -> Result<()> {
    if let Some(path) = &args.output {
        session.export_csv(path)?;
    }
    output::emit(
        &CleanSummary {
            rows: session.records().len(),
            locations: session.rows_per_location(),
            output: args.output,
        },
        format,
    )
}

fn handle_trend(
    session: &Session,
    settings: &Settings,
    args: TrendArgs,
    format: OutputFormat,
) -> Result<()> {
    let country = args
        .country
        .or_else(|| settings.countries.first().cloned())
        .or_else(|| session.locations().into_iter().next())
        .ok_or_else(|| anyhow!("no location to plot: the cleaned table is empty"))?;
    let metric = args.metric.unwrap_or(settings.metric);
    let start = args.start.unwrap_or(settings.start_date);
    let end = args.end.unwrap_or(settings.end_date);
    if start > end {
        return Err(ConfigError::InvalidRange { start, end }.into());
    }

    let chart = TrendChart::build(session.records(), &country, metric, start, end);
    if chart.is_empty() {
        warn!("no {} values for {} between {} and {}", metric, country, start, end);
    }
    output::emit(&chart, format)
}

fn handle_compare(
    session: &Session,
    settings: &Settings,
    args: CompareArgs,
    format: OutputFormat,
) -> Result<()> {
    let metric = args.metric.unwrap_or(settings.metric);
    let date = match args.date {
        Some(date) => date,
        None => stats::latest_date(session.records())
            .ok_or_else(|| anyhow!("no dates to compare: the cleaned table is empty"))?,
    };

    let chart = ComparisonChart::build(session.records(), metric, date);
    if chart.bars.is_empty() {
        warn!("no rows dated {}", date);
    }
    output::emit(&chart, format)
}
