//! The `nullflow` binary's entry point: argument parsing, logging setup,
//! and the `infer` subcommand driver.

pub mod args;
pub mod driver;
pub mod logging;

use clap::Parser;

use args::{CliArgs, Command};

pub fn run() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    logging::init(&args.log_level, args.quiet);

    match args.command {
        Command::Infer { input, format } => driver::infer(&input, format.unwrap_or(args::Format::Table)),
    }
}
