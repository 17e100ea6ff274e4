//! File-level decoding helpers.
//!
//! Drives a [`BlockDecoder`] from a seekable source into any `impl Write`.
//! Which bytes of a file form a block is the caller's business (a container
//! format, or the CLI's `--offset` / `--length`); these helpers take the
//! answer as a [`BlockSpan`].

use std::fs::File;
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::block::{BlockDecoder, DecodeError};
use crate::config::DecoderOptions;

/// Conventional extension of a raw compressed block file.
pub const BLOCK_EXTENSION: &str = "lzb";

/// Suffix appended to inputs without [`BLOCK_EXTENSION`].
pub const OUTPUT_SUFFIX: &str = ".out";

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// Location of one compressed block within a seekable source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockSpan {
    /// Byte offset of the first compressed byte.
    pub offset: u64,
    /// Compressed length; `None` runs to the end of the source.
    pub compressed_len: Option<u64>,
}

impl BlockSpan {
    pub fn new(offset: u64, compressed_len: Option<u64>) -> Self {
        Self { offset, compressed_len }
    }

    /// The whole source is one block.
    pub fn whole() -> Self {
        Self::default()
    }
}

/// Byte counts for one decoded block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeSummary {
    pub compressed: u64,
    pub decompressed: u64,
}

impl DecodeSummary {
    /// Decompressed / compressed; 0 for an empty input.
    pub fn ratio(&self) -> f64 {
        if self.compressed == 0 {
            0.0
        } else {
            self.decompressed as f64 / self.compressed as f64
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoding
// ─────────────────────────────────────────────────────────────────────────────

/// Call `fill` with a `fill_size` buffer until the block is exhausted,
/// writing every chunk to `dst`.
pub fn decode_to_writer<R: Read, W: Write>(
    decoder: &mut BlockDecoder<R>,
    dst: &mut W,
    fill_size: usize,
) -> Result<DecodeSummary, DecodeError> {
    let mut buf = vec![0u8; fill_size.max(1)];
    loop {
        let n = decoder.fill(&mut buf)?;
        if n == 0 {
            break;
        }
        dst.write_all(&buf[..n])?;
    }
    Ok(DecodeSummary {
        compressed: decoder.total_in(),
        decompressed: decoder.total_out(),
    })
}

/// Seek `src` to `span` and decode that block into `dst`.
///
/// With a known `compressed_len`, `src` is left positioned right after the
/// block.
pub fn decode_span<S: Read + Seek, W: Write>(
    src: &mut S,
    span: BlockSpan,
    dst: &mut W,
    options: DecoderOptions,
    fill_size: usize,
) -> Result<DecodeSummary, DecodeError> {
    src.seek(SeekFrom::Start(span.offset))?;
    let mut decoder = BlockDecoder::with_options(&mut *src, span.compressed_len, options);
    decode_to_writer(&mut decoder, dst, fill_size)
}

/// Decode the block at `span` in the file `input` into `dst`.
pub fn decode_file<W: Write>(
    input: &Path,
    span: BlockSpan,
    dst: &mut W,
    options: DecoderOptions,
    fill_size: usize,
) -> Result<DecodeSummary, DecodeError> {
    let mut src = File::open(input)?;
    let summary = decode_span(&mut src, span, dst, options, fill_size)?;
    tracing::debug!(
        input = %input.display(),
        compressed = summary.compressed,
        decompressed = summary.decompressed,
        "block decoded"
    );
    Ok(summary)
}

/// Decode the block at `span` in `input`, creating (or truncating) `output`.
///
/// `output` is only created once `input` has been opened.
pub fn decode_file_to_path(
    input: &Path,
    output: &Path,
    span: BlockSpan,
    options: DecoderOptions,
    fill_size: usize,
) -> Result<DecodeSummary, DecodeError> {
    let mut src = File::open(input)?;
    let mut dst = BufWriter::new(File::create(output)?);
    let summary = decode_span(&mut src, span, &mut dst, options, fill_size)?;
    dst.flush()?;
    tracing::debug!(
        input = %input.display(),
        output = %output.display(),
        compressed = summary.compressed,
        decompressed = summary.decompressed,
        "block decoded"
    );
    Ok(summary)
}

/// Default output path for `input`: strip a `.lzb` extension, otherwise
/// append `.out`.
pub fn output_path_for(input: &Path) -> PathBuf {
    match input.extension() {
        Some(ext) if ext == BLOCK_EXTENSION => input.with_extension(""),
        _ => {
            let mut name = input.as_os_str().to_owned();
            name.push(OUTPUT_SUFFIX);
            PathBuf::from(name)
        }
    }
}
