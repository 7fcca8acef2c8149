//! CLI module - Argument parsing, session state and output

mod args;
mod commands;
mod output;
mod session;

pub use args::{Cli, Command, OutputFormat};
pub use commands::{resolve_settings, run};
pub use output::TextReport;
pub use session::Session;
