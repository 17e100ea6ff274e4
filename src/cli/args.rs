//! Command-line arguments for the `lzstream` binary.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::cli::arg_utils::{parse_buffer_size, parse_size};
use crate::config::{DecoderOptions, Strictness, DEFAULT_FILL_SIZE, INPUT_CHUNK_SIZE};
use crate::io::BlockSpan;

/// Streaming decoder for raw LZ-style compressed blocks.
///
/// Each INPUT holds one block (or one block at `--offset`, `--length`
/// bytes long). Output goes to INPUT with `.lzb` stripped, or `.out`
/// appended, unless `-o` or `-c` says otherwise.
#[derive(Debug, Parser)]
#[command(name = "lzstream", version, about)]
pub struct Args {
    /// Compressed block files.
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Output file (single input only).
    #[arg(short, long, value_name = "PATH", conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Write decoded bytes to standard output.
    #[arg(short = 'c', long)]
    pub stdout: bool,

    /// Byte offset of the block within each input.
    #[arg(long, value_name = "N", default_value = "0", value_parser = parse_size)]
    pub offset: u64,

    /// Compressed length of the block; defaults to the rest of the input.
    #[arg(long, value_name = "N", value_parser = parse_size)]
    pub length: Option<u64>,

    /// Bytes requested per decode call.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_FILL_SIZE, value_parser = parse_buffer_size)]
    pub fill_size: usize,

    /// Compressed bytes staged per source read.
    #[arg(long, value_name = "N", default_value_t = INPUT_CHUNK_SIZE, value_parser = parse_buffer_size)]
    pub input_chunk: usize,

    /// Skip back-reference validation.
    #[arg(long)]
    pub trust_input: bool,

    /// More log output (repeatable).
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Errors only.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn to_options(&self) -> DecoderOptions {
        let strictness = if self.trust_input {
            Strictness::Trusting
        } else {
            Strictness::Strict
        };
        DecoderOptions::new()
            .with_strictness(strictness)
            .with_input_chunk_size(self.input_chunk)
    }

    pub fn span(&self) -> BlockSpan {
        BlockSpan::new(self.offset, self.length)
    }

    /// Default tracing filter directive for the verbosity flags.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
