//! Binary entry point for the `lzstream` command-line tool.
//!
//! Parses arguments, installs logging, and hands off to [`lzstream::cli::run`].
//! Any error is printed as `lzstream: <error>` and the process exits with 1.

use std::process::ExitCode;

use clap::Parser;

use lzstream::cli::{self, Args};

fn main() -> ExitCode {
    let args = Args::parse();
    cli::init_logging(&args);
    match cli::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("lzstream: {e:#}");
            ExitCode::FAILURE
        }
    }
}
