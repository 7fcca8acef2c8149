//! Charts module - Chart data consumed by external renderers

mod choropleth;
mod comparison;
mod heatmap;
mod trend;

pub use choropleth::{ChoroplethData, Region};
pub use comparison::{Bar, ComparisonChart};
pub use heatmap::HeatmapData;
pub use trend::{TrendChart, TrendPoint};
