//! Output Module
//! Text and JSON rendering of command results.

use super::args::OutputFormat;
use crate::charts::{ChoroplethData, ComparisonChart, HeatmapData, TrendChart};
use anyhow::Result;
use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;

/// Plain-text rendering of a command result.
pub trait TextReport {
    fn to_text(&self) -> String;
}

/// Render a result in the requested format.
pub fn render<T: Serialize + TextReport>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(value.to_text()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
    }
}

/// Print a result to stdout.
pub fn emit<T: Serialize + TextReport>(value: &T, format: OutputFormat) -> Result<()> {
    println!("{}", render(value, format)?);
    Ok(())
}

/// Summary of a cleaning run.
#[derive(Debug, Serialize)]
pub struct CleanSummary {
    pub rows: usize,
    pub locations: Vec<(String, usize)>,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct LocationList {
    pub locations: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct InsightReport {
    pub insights: Vec<String>,
}

fn format_value(value: Option<f64>) -> String {
    match value {
        None => "-".to_string(),
        Some(v) if v.is_nan() => "NaN".to_string(),
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{:.0}", v),
        Some(v) => format!("{:.4}", v),
    }
}

impl TextReport for CleanSummary {
    fn to_text(&self) -> String {
        let mut out = format!(
            "Cleaned table: {} rows, {} locations\n",
            self.rows,
            self.locations.len()
        );
        for (location, count) in &self.locations {
            let _ = writeln!(out, "  {:<32} {:>8}", location, count);
        }
        if let Some(path) = &self.output {
            let _ = writeln!(out, "Written to {}", path.display());
        }
        out.trim_end().to_string()
    }
}

impl TextReport for LocationList {
    fn to_text(&self) -> String {
        self.locations.join("\n")
    }
}

impl TextReport for InsightReport {
    fn to_text(&self) -> String {
        self.insights.join("\n")
    }
}

impl TextReport for TrendChart {
    fn to_text(&self) -> String {
        let mut out = format!("{} ({} to {})\n", self.title, self.start, self.end);
        if self.points.is_empty() {
            out.push_str("  no data in range");
            return out;
        }
        for point in &self.points {
            let _ = writeln!(out, "  {}  {:>16}", point.date, format_value(Some(point.value)));
        }
        let s = &self.stats;
        let _ = write!(
            out,
            "n={} min={} max={} mean={} median={} std={}",
            s.count,
            format_value(Some(s.min)),
            format_value(Some(s.max)),
            format_value(Some(s.mean)),
            format_value(Some(s.median)),
            format_value(Some(s.std)),
        );
        out
    }
}

impl TextReport for ComparisonChart {
    fn to_text(&self) -> String {
        let mut out = format!("{} ({})\n", self.title, self.metric.title());
        if self.bars.is_empty() {
            out.push_str("  no rows on this date");
            return out;
        }
        for bar in &self.bars {
            let _ = writeln!(out, "  {:<32} {:>16}", bar.location, format_value(bar.value));
        }
        out.trim_end().to_string()
    }
}

impl TextReport for ChoroplethData {
    fn to_text(&self) -> String {
        let date = self
            .date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let mut out = format!("{} ({})\n", self.title, date);
        for region in &self.regions {
            let shown = region
                .value
                .map(|v| format!("{:.1}%", v * 100.0))
                .unwrap_or_else(|| "-".to_string());
            let _ = writeln!(out, "  {:<32} {:>8}", region.location, shown);
        }
        out.trim_end().to_string()
    }
}

impl TextReport for HeatmapData {
    fn to_text(&self) -> String {
        let mut out = format!("{} ({} locations)\n", self.title, self.locations);
        let _ = write!(out, "{:<18}", "");
        for metric in &self.matrix.metrics {
            let _ = write!(out, "{:>18}", metric.column());
        }
        out.push('\n');
        for (metric, row) in self.matrix.metrics.iter().zip(&self.matrix.values) {
            let _ = write!(out, "{:<18}", metric.column());
            for r in row {
                let _ = write!(out, "{:>18.2}", r);
            }
            out.push('\n');
        }
        out.trim_end().to_string()
    }
}
