//! Command-line argument definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "nullflow",
    version,
    about = "Nullability inference engine for statically typed object-oriented languages"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity passed straight through to `tracing_subscriber`'s
    /// `EnvFilter` (e.g. `info`, `debug`, `nullflow_builder=trace`).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Suppress per-symbol progress logging.
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the flow graph for a JSON-encoded bound tree, solve it, and
    /// report inferred annotations.
    Infer {
        /// Path to the JSON input file (a serialized bound tree plus symbol table).
        input: PathBuf,

        /// Output format. Defaults to a human-readable table.
        #[arg(long, value_enum)]
        format: Option<Format>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Table,
}
