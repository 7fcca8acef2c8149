//! Data module - CSV loading, schema and the cleaning pipeline

mod loader;
mod pipeline;
pub mod schema;
mod table;

pub use loader::{DataLoader, LoaderError};
pub use pipeline::{CleaningPipeline, PipelineError};
pub use schema::Metric;
pub use table::{records_to_frame, CleanRecord, Observation};
