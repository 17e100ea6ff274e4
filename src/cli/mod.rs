//! Command-line front end for the `lzstream` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`args`]      | clap-derived [`Args`] and their mapping onto [`DecoderOptions`](crate::config::DecoderOptions). |
//! | [`arg_utils`] | Size parsing (`64K`, `1MiB`, …) for numeric flags. |
//!
//! Typical call sequence: `Args::parse` → [`init_logging`] → [`run`].

pub mod arg_utils;
pub mod args;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::io::{decode_file, decode_file_to_path, output_path_for, DecodeSummary};

pub use args::Args;

/// Install a stderr `tracing` subscriber. `RUST_LOG` wins over the
/// verbosity flags when set.
pub fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lzstream={}", args.log_level())));
    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Decode every input named by `args`.
pub fn run(args: &Args) -> Result<()> {
    if args.output.is_some() && args.inputs.len() > 1 {
        bail!("--output can only be used with a single input");
    }
    if args.stdout {
        return run_to_stdout(args);
    }

    let jobs: Vec<(&Path, PathBuf)> = args
        .inputs
        .iter()
        .map(|input| {
            let output = args
                .output
                .clone()
                .unwrap_or_else(|| output_path_for(input));
            (input.as_path(), output)
        })
        .collect();

    // Decoders share nothing, so inputs decode independently.
    let failures: Vec<anyhow::Error> = jobs
        .par_iter()
        .filter_map(|(input, output)| decode_one(args, input, output).err())
        .collect();

    let total = failures.len();
    let mut failures = failures.into_iter();
    match failures.next() {
        None => Ok(()),
        Some(first) if total == 1 => Err(first),
        Some(first) => {
            for err in failures {
                tracing::error!("{err:#}");
            }
            Err(first.context(format!("{total} of {} inputs failed", jobs.len())))
        }
    }
}

fn decode_one(args: &Args, input: &Path, output: &Path) -> Result<DecodeSummary> {
    if input == output {
        bail!("{}: output would overwrite input", input.display());
    }
    let summary = decode_file_to_path(input, output, args.span(), args.to_options(), args.fill_size)
        .with_context(|| format!("{}", input.display()))?;
    tracing::info!(
        "{} → {}: {} → {} bytes ({:.2}x)",
        input.display(),
        output.display(),
        summary.compressed,
        summary.decompressed,
        summary.ratio()
    );
    Ok(summary)
}

/// Stdout is shared, so inputs are decoded one after another in order.
fn run_to_stdout(args: &Args) -> Result<()> {
    let stdout = io::stdout();
    let mut dst = io::BufWriter::new(stdout.lock());
    for input in &args.inputs {
        let summary = decode_file(input, args.span(), &mut dst, args.to_options(), args.fill_size)
            .with_context(|| format!("{}", input.display()))?;
        tracing::info!(
            "{}: {} → {} bytes",
            input.display(),
            summary.compressed,
            summary.decompressed
        );
    }
    dst.flush().context("flushing stdout")?;
    Ok(())
}
