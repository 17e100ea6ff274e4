// Integration tests for BlockDecoder (block/decoder.rs).
//
// Covers:
//   - round trips against the reference encoder under many chunkings
//   - resume idempotence, self-overlapping matches, window-backed matches
//   - extension-length boundaries and truncation at every offset
//   - strict / trusting distance handling and deferred errors
//   - reset / release lifecycle, known-length sources, std::io::Read

use std::io::{self, Cursor, Read};

use lzstream::block::MAX_DISTANCE;
use lzstream::config::{MAX_INPUT_CHUNK_SIZE, MIN_INPUT_CHUNK_SIZE, WINDOW_SIZE};
use lzstream::{BlockDecoder, DecodeError, DecoderOptions, Strictness};

use crate::support::{
    compress, corpus, decode, decode_with, drain, BlockBuilder, Dribble, FailAfter, Flaky,
    Script, XorShift,
};

fn trusting() -> DecoderOptions {
    DecoderOptions::new().with_strictness(Strictness::Trusting)
}

fn noise(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = XorShift::new(seed);
    (0..len).map(|_| rng.next_u64() as u8).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Round trip / chunking invariance
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_round_trip_fixed_chunkings() {
    let data = corpus(200_000);
    let block = compress(&data);
    for step in [1usize, 2, 3, 7, 64, 1000, 4096, 65_536, 300_000] {
        assert_eq!(decode(&block, step).unwrap(), data, "step {step}");
    }
}

#[test]
fn test_round_trip_random_chunkings() {
    let data = corpus(150_000);
    let block = compress(&data);
    for seed in 1..=8u64 {
        let mut rng = XorShift::new(seed);
        let mut dec = BlockDecoder::new(Cursor::new(&block));
        let out = drain(&mut dec, || rng.size(5000)).unwrap();
        assert_eq!(out, data, "seed {seed}");
    }
}

#[test]
fn test_single_call_matches_many_calls() {
    let data = corpus(80_000);
    let block = compress(&data);

    let mut whole = vec![0u8; data.len() + 16];
    let mut dec = BlockDecoder::new(Cursor::new(&block));
    let n = dec.fill(&mut whole).unwrap();
    whole.truncate(n);

    let mut rng = XorShift::new(42);
    let mut dec = BlockDecoder::new(Cursor::new(&block));
    let pieces = drain(&mut dec, || rng.size(97)).unwrap();

    assert_eq!(whole, pieces);
    assert_eq!(whole, data);
}

#[test]
fn test_incompressible_and_empty_input() {
    let data = noise(10_000, 9);
    assert_eq!(decode(&compress(&data), 333).unwrap(), data);
    assert_eq!(decode(&compress(&[]), 16).unwrap(), b"");
    assert_eq!(decode(&[], 16).unwrap(), b"");
}

#[test]
fn test_short_read_source() {
    let data = corpus(40_000);
    let block = compress(&data);
    for source_step in [1usize, 3, 200] {
        let mut dec = BlockDecoder::new(Dribble { data: &block, step: source_step });
        let out = drain(&mut dec, || 777).unwrap();
        assert_eq!(out, data, "source step {source_step}");
    }
}

#[test]
fn test_input_chunk_size_does_not_change_output() {
    let data = corpus(50_000);
    let block = compress(&data);
    for chunk in [MIN_INPUT_CHUNK_SIZE, 4096, MAX_INPUT_CHUNK_SIZE] {
        let opts = DecoderOptions::new().with_input_chunk_size(chunk);
        assert_eq!(decode_with(&block, 501, opts).unwrap(), data, "chunk {chunk}");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Match copies
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_single_literal_run_length_match() {
    // One literal 'A', match code 0 (length 4) at distance 1.
    let block = [0x10, 0x41, 0x01, 0x00];
    for step in [1, 2, 5, 64] {
        assert_eq!(decode(&block, step).unwrap(), b"AAAAA");
    }
    // Match code 4 is a length of 8.
    assert_eq!(decode(&[0x14, 0x41, 0x01, 0x00], 4).unwrap(), vec![b'A'; 9]);
}

#[test]
fn test_self_overlapping_match() {
    let block = BlockBuilder::new().sequence(b"x", 1, 100).last(b"");
    for step in [1, 3, 50, 1000] {
        assert_eq!(decode(&block, step).unwrap(), vec![b'x'; 101], "step {step}");
    }

    // Period 3 repeated 1000 bytes.
    let block = BlockBuilder::new().sequence(b"abc", 3, 1000).last(b"!");
    let mut expected: Vec<u8> = b"abc".iter().copied().cycle().take(1003).collect();
    expected.push(b'!');
    for step in [1, 2, 4, 5, 17, 4096] {
        assert_eq!(decode(&block, step).unwrap(), expected, "step {step}");
    }
}

#[test]
fn test_match_source_before_current_buffer() {
    let lits = noise(300, 1);
    let block = BlockBuilder::new().sequence(&lits, 300, 50).last(b"end");
    let mut expected = lits.clone();
    expected.extend_from_slice(&lits[..50]);
    expected.extend_from_slice(b"end");
    // Fill size far below the distance: every match byte comes from history.
    for step in [1, 16, 299, 300, 301, 4096] {
        assert_eq!(decode(&block, step).unwrap(), expected, "step {step}");
    }
}

#[test]
fn test_match_at_maximum_distance() {
    let lits = noise(MAX_DISTANCE, 2);
    let block = BlockBuilder::new()
        .sequence(&lits, MAX_DISTANCE as u16, 10)
        .last(b"");
    let mut expected = lits.clone();
    expected.extend_from_slice(&lits[..10]);
    for step in [1000, 70_000] {
        assert_eq!(decode(&block, step).unwrap(), expected, "step {step}");
    }
}

#[test]
fn test_match_after_window_wraps() {
    // More output than the window holds before the match.
    let lits = noise(WINDOW_SIZE + 34_465, 3);
    let block = BlockBuilder::new()
        .sequence(&lits, 40_000, 600)
        .last(b"z");
    let mut expected = lits.clone();
    let start = expected.len() - 40_000;
    expected.extend_from_within(start..start + 600);
    expected.push(b'z');
    for step in [511, 8192, 200_000] {
        assert_eq!(decode(&block, step).unwrap(), expected, "step {step}");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Extension lengths
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_literal_length_extension_boundaries() {
    // 15 + 0, 15 + 1, 15 + 255 + 0, 15 + 255 * 2 + 3.
    for len in [15usize, 16, 270, 528] {
        let lits = noise(len, len as u64);
        let block = BlockBuilder::new().last(&lits);
        for step in [1, 7, 1000] {
            assert_eq!(decode(&block, step).unwrap(), lits, "len {len} step {step}");
        }
    }
}

#[test]
fn test_match_length_extension_boundaries() {
    // 19 + 0, 19 + 1, 19 + 255 + 0, 19 + 255 * 2 + 7.
    for len in [19usize, 20, 274, 536] {
        let block = BlockBuilder::new().sequence(b"ab", 2, len).last(b".");
        let mut expected: Vec<u8> = b"ab".iter().copied().cycle().take(2 + len).collect();
        expected.push(b'.');
        for step in [1, 7, 1000] {
            assert_eq!(decode(&block, step).unwrap(), expected, "len {len} step {step}");
        }
    }
}

#[test]
fn test_extension_bytes_split_across_calls() {
    let lits = noise(15 + 255 + 255 + 40, 5);
    let block = BlockBuilder::new()
        .sequence(&lits, 1, 19 + 255 * 3 + 1)
        .last(b"");
    let mut expected = lits.clone();
    expected.extend(std::iter::repeat(*lits.last().unwrap()).take(19 + 255 * 3 + 1));

    let mut dec = BlockDecoder::new(Dribble { data: &block, step: 1 });
    let out = drain(&mut dec, || 1).unwrap();
    assert_eq!(out, expected);
}

// ─────────────────────────────────────────────────────────────────────────────
// Truncation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_truncation_at_every_offset_yields_prefix() {
    let data = corpus(1500);
    let block = compress(&data);
    for cut in 0..=block.len() {
        for step in [1usize, 64] {
            let out = decode(&block[..cut], step)
                .unwrap_or_else(|e| panic!("cut {cut} step {step}: {e}"));
            assert!(data.starts_with(&out), "cut {cut} step {step}");
        }
    }
}

#[test]
fn test_truncation_inside_extended_lengths() {
    let lits = noise(300, 6);
    let block = BlockBuilder::new()
        .sequence(&lits, 3, 19 + 255 + 10)
        .last(b"tail");
    let mut full = lits.clone();
    let start = full.len() - 3;
    for i in 0..(19 + 255 + 10) {
        full.push(full[start + i]);
    }
    full.extend_from_slice(b"tail");
    assert_eq!(decode(&block, 100).unwrap(), full);

    for cut in 0..=block.len() {
        let out = decode(&block[..cut], 13).unwrap();
        assert!(full.starts_with(&out), "cut {cut}");
    }

    // Token, 255, 30, 300 literals, distance, then only the first match
    // extension byte: nothing of the match is emitted.
    let cut = 1 + 2 + 300 + 2 + 1;
    assert_eq!(block[cut - 1], 255);
    assert_eq!(decode(&block[..cut], 1000).unwrap(), lits);
}

#[test]
fn test_calls_after_end_return_zero() {
    let block = compress(b"hello hello hello hello");
    let mut dec = BlockDecoder::new(Cursor::new(&block));
    let _ = drain(&mut dec, || 8).unwrap();
    let mut buf = [0u8; 8];
    assert_eq!(dec.fill(&mut buf).unwrap(), 0);
    assert_eq!(dec.fill(&mut buf).unwrap(), 0);
    assert_eq!(dec.read_byte().unwrap(), None);
}

// ─────────────────────────────────────────────────────────────────────────────
// Strictness
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_strict_rejects_distance_past_block_start() {
    let err = decode(&[0x00, 0x01, 0x00], 16).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::CorruptStream { distance: 1, available: 0 }
    ));
}

#[test]
fn test_strict_defers_corruption_after_output() {
    let block = [0x10, b'A', 0x02, 0x00, 0x50, b'h', b'e', b'l', b'l', b'o'];
    let mut dec = BlockDecoder::new(Cursor::new(&block[..]));
    let mut buf = [0u8; 64];
    assert_eq!(dec.fill(&mut buf).unwrap(), 1);
    assert_eq!(buf[0], b'A');
    for _ in 0..3 {
        assert!(matches!(
            dec.fill(&mut buf),
            Err(DecodeError::CorruptStream { distance: 2, available: 1 })
        ));
    }
}

#[test]
fn test_strict_rejects_distance_zero() {
    let mut dec = BlockDecoder::new(Cursor::new(&[0x10u8, b'A', 0x00, 0x00][..]));
    let mut buf = [0u8; 8];
    assert_eq!(dec.fill(&mut buf).unwrap(), 1);
    assert!(matches!(
        dec.fill(&mut buf),
        Err(DecodeError::CorruptStream { distance: 0, available: 1 })
    ));
}

#[test]
fn test_trusting_reads_unwritten_history_as_zero() {
    assert_eq!(decode_with(&[0x00, 0x05, 0x00], 16, trusting()).unwrap(), [0u8; 4]);
    assert_eq!(
        decode_with(&[0x10, b'A', 0x00, 0x00], 16, trusting()).unwrap(),
        [b'A', 0, 0, 0, 0]
    );
}

#[test]
fn test_trusting_never_panics_on_noise() {
    for seed in 1..=32u64 {
        let junk = noise(2048, seed);
        for step in [1usize, 100, 70_000] {
            let _ = decode_with(&junk, step, trusting()).unwrap();
            let _ = decode(&junk, step);
        }
    }
}

#[test]
fn test_trusting_matches_strict_on_valid_input() {
    let data = corpus(30_000);
    let block = compress(&data);
    assert_eq!(decode_with(&block, 1234, trusting()).unwrap(), data);
}

// ─────────────────────────────────────────────────────────────────────────────
// Source errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_source_error_after_output_is_deferred() {
    let src = FailAfter { data: &[0x30, b'a', b'b', b'c'], kind: io::ErrorKind::Other };
    let mut dec = BlockDecoder::new(src);
    let mut buf = [0u8; 64];
    assert_eq!(dec.fill(&mut buf).unwrap(), 3);
    assert_eq!(&buf[..3], b"abc");
    match dec.fill(&mut buf) {
        Err(DecodeError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::Other),
        other => panic!("expected I/O error, got {other:?}"),
    }
}

#[test]
fn test_source_error_inside_literal_run_loses_nothing() {
    let src = Script(vec![
        Ok(vec![0x50, b'h', b'e']),
        Err(io::Error::new(io::ErrorKind::WouldBlock, "not yet")),
        Ok(b"llo".to_vec()),
    ]);
    let mut dec = BlockDecoder::new(src);
    let mut buf = [0u8; 64];
    let mut decoded = Vec::new();
    let mut errors = 0;
    loop {
        match dec.fill(&mut buf) {
            Ok(0) => break,
            Ok(n) => decoded.extend_from_slice(&buf[..n]),
            Err(DecodeError::Io(e)) => {
                assert_eq!(e.kind(), io::ErrorKind::WouldBlock);
                errors += 1;
                assert!(errors < 3, "error reported more than once");
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(decoded, b"hello");
    assert_eq!(errors, 1);
    assert_eq!(dec.total_in(), 6);
    assert_eq!(dec.total_out(), 5);
}

#[test]
fn test_source_error_without_output_is_immediate() {
    let src = FailAfter { data: &[], kind: io::ErrorKind::BrokenPipe };
    let mut dec = BlockDecoder::new(src);
    let err = dec.fill(&mut [0u8; 4]).unwrap_err();
    assert!(matches!(err, DecodeError::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
}

#[test]
fn test_interrupted_reads_are_retried() {
    let data = corpus(5000);
    let block = compress(&data);
    let mut dec = BlockDecoder::new(Flaky { data: &block, interrupt_next: false });
    assert_eq!(drain(&mut dec, || 100).unwrap(), data);
}

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_reset_reuses_decoder_for_next_block() {
    let d1 = corpus(20_000);
    let d2 = b"second block, second block, second block".to_vec();
    let (b1, b2) = (compress(&d1), compress(&d2));

    let mut dec = BlockDecoder::new(Cursor::new(b1.clone()));
    assert_eq!(drain(&mut dec, || 4096).unwrap(), d1);
    assert_eq!(dec.total_in(), b1.len() as u64);
    assert_eq!(dec.total_out(), d1.len() as u64);

    let previous = dec.reset(Cursor::new(b2.clone()), None).unwrap();
    assert_eq!(previous.position(), b1.len() as u64);
    assert_eq!(dec.total_in(), 0);
    assert_eq!(dec.total_out(), 0);
    assert_eq!(drain(&mut dec, || 7).unwrap(), d2);
}

#[test]
fn test_reset_clears_history_and_corruption() {
    let mut dec = BlockDecoder::new(Cursor::new(vec![0x10, b'A', 0x09, 0x00]));
    let mut buf = [0u8; 16];
    assert_eq!(dec.fill(&mut buf).unwrap(), 1);
    assert!(dec.fill(&mut buf).is_err());

    // History from the previous block is gone.
    dec.reset(Cursor::new(vec![0x00, 0x01, 0x00]), None);
    assert!(matches!(
        dec.fill(&mut buf),
        Err(DecodeError::CorruptStream { distance: 1, available: 0 })
    ));

    dec.reset(Cursor::new(vec![0x10, b'B', 0x01, 0x00]), None);
    assert_eq!(drain(&mut dec, || 16).unwrap(), b"BBBBB");
}

#[test]
fn test_release_returns_source_and_blocks_fill() {
    let block = compress(b"abcdefabcdefabcdef");
    let mut dec = BlockDecoder::new(Cursor::new(block.clone()));
    let mut buf = [0u8; 4];
    assert_eq!(dec.fill(&mut buf).unwrap(), 4);

    let src = dec.release().unwrap();
    assert_eq!(src.get_ref(), &block);
    assert!(!dec.is_bound());
    assert!(matches!(dec.fill(&mut buf), Err(DecodeError::Released)));
    assert!(matches!(dec.read_byte(), Err(DecodeError::Released)));
    assert!(dec.release().is_none());

    // A released decoder can be bound again.
    assert!(dec.reset(Cursor::new(block), None).is_none());
    assert_eq!(drain(&mut dec, || 5).unwrap(), b"abcdefabcdefabcdef");
}

#[test]
fn test_known_length_leaves_trailing_bytes() {
    let d1 = corpus(3000);
    let d2 = corpus(100);
    let b1 = compress(&d1);
    let b2 = compress(&d2);
    let mut joined = b1.clone();
    joined.extend_from_slice(&b2);

    let mut cur = Cursor::new(joined);
    {
        let mut dec = BlockDecoder::with_compressed_len(&mut cur, b1.len() as u64);
        assert_eq!(drain(&mut dec, || 100).unwrap(), d1);
    }
    assert_eq!(cur.position(), b1.len() as u64);

    let mut dec = BlockDecoder::new(&mut cur);
    assert_eq!(drain(&mut dec, || 100).unwrap(), d2);
}

#[test]
fn test_known_length_longer_than_source() {
    let block = compress(b"short");
    let mut dec = BlockDecoder::with_compressed_len(Cursor::new(block), 1 << 20);
    assert_eq!(drain(&mut dec, || 3).unwrap(), b"short");
}

#[test]
fn test_into_inner_returns_source() {
    let dec = BlockDecoder::new(Cursor::new(vec![1u8, 2, 3]));
    assert_eq!(dec.into_inner().map(Cursor::into_inner), Some(vec![1, 2, 3]));
}

// ─────────────────────────────────────────────────────────────────────────────
// std::io::Read
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_read_impl_round_trip() {
    let data = corpus(70_000);
    let block = compress(&data);
    let mut dec = BlockDecoder::new(Cursor::new(&block));
    let mut out = Vec::new();
    dec.read_to_end(&mut out).unwrap();
    assert_eq!(out, data);
}

#[test]
fn test_read_impl_maps_errors() {
    let mut dec = BlockDecoder::new(Cursor::new(vec![0x10, b'A', 0x02, 0x00]));
    let mut out = Vec::new();
    let err = dec.read_to_end(&mut out).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    assert_eq!(out, b"A");

    dec.release();
    let err = dec.read(&mut [0u8; 4]).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::NotConnected);
}
