//! Pinpoint CLI Library
//!
//! Command-line interface for the Pinpoint locator engine.

#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
mod output;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, EvaluateArgs, InspectArgs, OutputFormat, RefineArgs,
    RefineRequestArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{render_best, render_checks, render_evaluation, render_inspection, stars};
