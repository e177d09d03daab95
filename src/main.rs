//! dictgen: lock-guarded dictionary generator for parallel builds.
//!
//! This is the entry point for the `dictgen` CLI. It parses arguments, sets
//! up logging, runs the generator, and maps errors to exit codes.

mod cli;
mod commands;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod fs;
pub mod generate;
pub mod locks;
mod logging;
pub mod tool;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);

    match commands::dispatch(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
