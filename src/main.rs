//! refpipe CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: parse args, run one
//! conversion, and exit with status 1 on any failure (including a missing
//! input). For programmatic use, prefer the library API (`refpipe::api`).

use std::error::Error as _;
use std::process::ExitCode;

use clap::Parser;

mod cli;

fn main() -> ExitCode {
    let args = cli::CliArgs::parse();
    match cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("Error: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
