//! E2E: error reporting across the public API.
//!
//! Corrupt distances, truncated files, failing sinks, and missing files must
//! surface as `DecodeError` values (or `io::Error` through the `Read`
//! adapter), never as panics.

use std::io::{self, Cursor, Read, Write};

use lzstream::io::{decode_file, decode_file_to_path, decode_to_writer, BlockSpan};
use lzstream::{BlockDecoder, DecodeError, DecoderOptions, Strictness};
use tempfile::TempDir;

/// Writer that accepts `limit` bytes, then fails.
struct FullDisk {
    written: usize,
    limit: usize,
}

impl Write for FullDisk {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written >= self.limit {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "disk full"));
        }
        let n = buf.len().min(self.limit - self.written);
        self.written += n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_error_messages() {
    let e = DecodeError::CorruptStream { distance: 7, available: 3 };
    assert_eq!(e.to_string(), "corrupt stream: match distance 7 with 3 bytes of history");
    assert_eq!(DecodeError::Released.to_string(), "decoder has no bound source");
    let e = DecodeError::from(io::Error::new(io::ErrorKind::Other, "boom"));
    assert_eq!(e.to_string(), "I/O error: boom");
}

#[test]
fn test_sink_failure_is_reported() {
    let data = vec![b'z'; 50_000];
    let block = lz4_flex::block::compress(&data);
    let mut dec = BlockDecoder::new(Cursor::new(block));
    let mut sink = FullDisk { written: 0, limit: 10_000 };
    let err = decode_to_writer(&mut dec, &mut sink, 4096).unwrap_err();
    assert!(matches!(err, DecodeError::Io(ref e) if e.kind() == io::ErrorKind::WriteZero));
}

#[test]
fn test_truncated_file_decodes_prefix() {
    let dir = TempDir::new().unwrap();
    let data: Vec<u8> = (0..20_000u32).map(|i| (i % 200) as u8).collect();
    let block = lz4_flex::block::compress(&data);
    let path = dir.path().join("cut.lzb");
    std::fs::write(&path, &block[..block.len() / 2]).unwrap();

    let mut out = Vec::new();
    let summary = decode_file(&path, BlockSpan::whole(), &mut out, DecoderOptions::default(), 512)
        .unwrap();
    assert!(data.starts_with(&out));
    assert_eq!(summary.decompressed, out.len() as u64);
    assert_eq!(summary.compressed, (block.len() / 2) as u64);
}

#[test]
fn test_corrupt_file_strict_and_trusting() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.lzb");
    std::fs::write(&path, [0x20u8, b'o', b'k', 0x00, 0x10]).unwrap();

    let mut out = Vec::new();
    let err = decode_file(&path, BlockSpan::whole(), &mut out, DecoderOptions::default(), 64)
        .unwrap_err();
    assert!(matches!(
        err,
        DecodeError::CorruptStream { distance: 4096, available: 2 }
    ));
    // Bytes produced before the bad match were still delivered.
    assert_eq!(out, b"ok");

    out.clear();
    let trusting = DecoderOptions::new().with_strictness(Strictness::Trusting);
    decode_file(&path, BlockSpan::whole(), &mut out, trusting, 64).unwrap();
    assert_eq!(out.len(), 2 + 4);
}

#[test]
fn test_missing_input_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("absent.lzb");
    let output = dir.path().join("absent");
    let err = decode_file_to_path(&input, &output, BlockSpan::whole(), DecoderOptions::default(), 64)
        .unwrap_err();
    assert!(matches!(err, DecodeError::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
    assert!(!output.exists());
}

#[test]
fn test_read_adapter_error_kinds() {
    let mut dec = BlockDecoder::new(Cursor::new(vec![0x00u8, 0x01, 0x00]));
    let err = dec.read(&mut [0u8; 8]).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    let inner = err.into_inner().unwrap();
    assert!(inner.downcast_ref::<DecodeError>().is_some());
}
