//! Stats module - Snapshots, correlation and descriptive statistics

mod calculator;
mod correlation;
mod snapshot;

pub use calculator::{SeriesStats, StatsCalculator};
pub use correlation::{pearson, CorrelationMatrix};
pub use snapshot::{latest_by_location, latest_date, latest_slice, LocationSnapshot};
