//! E2E: streaming block decoding against reference-encoded input.
//!
//! Blocks are produced by an independent conforming encoder (`lz4_flex`) and
//! decoded through `fill` with caller buffers of varying sizes, through the
//! `std::io::Read` adapter, and through the `io` file helpers.

use std::io::{Cursor, Read, Write};

use lzstream::io::{decode_file, decode_span, decode_to_writer, BlockSpan};
use lzstream::{BlockDecoder, DecoderOptions};
use tempfile::NamedTempFile;

fn text(len: usize) -> Vec<u8> {
    b"It was the best of times, it was the worst of times, it was the age of wisdom. "
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}

fn binary(len: usize) -> Vec<u8> {
    // Sawtooth with a slowly drifting period.
    (0..len).map(|i| ((i % (97 + i / 4096)) * 3) as u8).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: every fill size reproduces the input
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_fill_sizes_reproduce_input() {
    for data in [text(100_000), binary(300_000)] {
        let block = lz4_flex::block::compress(&data);
        for fill in [1usize, 5, 255, 4096, 65_535, 65_536, 1 << 20] {
            let mut dec = BlockDecoder::new(Cursor::new(&block));
            let mut out = Vec::new();
            let summary = decode_to_writer(&mut dec, &mut out, fill).unwrap();
            assert_eq!(out, data, "fill {fill}");
            assert_eq!(summary.decompressed, data.len() as u64);
            assert_eq!(summary.compressed, block.len() as u64);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: a decoder is reused across many blocks
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_decoder_reused_across_blocks() {
    let inputs: Vec<Vec<u8>> = (1..=6).map(|i| text(i * 7919)).collect();
    let blocks: Vec<Vec<u8>> = inputs.iter().map(|d| lz4_flex::block::compress(d)).collect();

    let mut dec = BlockDecoder::new(Cursor::new(blocks[0].clone()));
    for (i, (data, block)) in inputs.iter().zip(&blocks).enumerate() {
        if i > 0 {
            dec.reset(Cursor::new(block.clone()), Some(block.len() as u64));
        }
        let mut out = Vec::new();
        dec.read_to_end(&mut out).unwrap();
        assert_eq!(&out, data, "block {i}");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: blocks embedded in a container file
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_blocks_at_offsets_in_file() {
    let a = text(20_000);
    let b = binary(50_000);
    let (ba, bb) = (lz4_flex::block::compress(&a), lz4_flex::block::compress(&b));

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"HEADER--").unwrap();
    file.write_all(&ba).unwrap();
    file.write_all(&bb).unwrap();
    file.flush().unwrap();

    let span_a = BlockSpan::new(8, Some(ba.len() as u64));
    let span_b = BlockSpan::new(8 + ba.len() as u64, Some(bb.len() as u64));

    let mut out = Vec::new();
    decode_file(file.path(), span_b, &mut out, DecoderOptions::default(), 1000).unwrap();
    assert_eq!(out, b);

    out.clear();
    decode_file(file.path(), span_a, &mut out, DecoderOptions::default(), 77).unwrap();
    assert_eq!(out, a);

    // Consecutive spans through one handle.
    let mut src = Cursor::new(std::fs::read(file.path()).unwrap());
    let mut both = Vec::new();
    decode_span(&mut src, span_a, &mut both, DecoderOptions::default(), 4096).unwrap();
    decode_span(&mut src, span_b, &mut both, DecoderOptions::default(), 4096).unwrap();
    assert_eq!(both.len(), a.len() + b.len());
    assert_eq!(&both[..a.len()], &a[..]);
    assert_eq!(&both[a.len()..], &b[..]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: io::copy through the Read adapter
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_io_copy_through_read_adapter() {
    let data = binary(123_456);
    let block = lz4_flex::block::compress(&data);
    let mut dec = BlockDecoder::new(Cursor::new(block));
    let mut out = Vec::new();
    let n = std::io::copy(&mut dec, &mut out).unwrap();
    assert_eq!(n, data.len() as u64);
    assert_eq!(out, data);
}

#[test]
fn test_whole_span_is_default() {
    assert_eq!(BlockSpan::whole(), BlockSpan::new(0, None));
}
