#![no_main]
use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use lzstream::{BlockDecoder, DecoderOptions, Strictness};

// Output cap so inputs made of extension bytes cannot run the fuzzer out of
// memory.
const MAX_OUTPUT: usize = 8 << 20;

fn drain(data: &[u8], options: DecoderOptions, fill: usize) -> Vec<u8> {
    let mut dec = BlockDecoder::with_options(Cursor::new(data), None, options);
    let mut buf = vec![0u8; fill];
    let mut out = Vec::new();
    while out.len() < MAX_OUTPUT {
        match dec.fill(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => out.extend_from_slice(&buf[..n]),
        }
    }
    out
}

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes: errors are fine, panics are not. Whatever the fill
    // size, the produced bytes must agree.
    let strict = DecoderOptions::default();
    let trusting = DecoderOptions::new().with_strictness(Strictness::Trusting);

    let whole = drain(data, strict, 1 << 16);
    let small = drain(data, strict, 7);
    let n = whole.len().min(small.len());
    assert_eq!(whole[..n], small[..n]);

    let t_whole = drain(data, trusting, 1 << 16);
    let t_single = drain(data, trusting, 1);
    let n = t_whole.len().min(t_single.len());
    assert_eq!(t_whole[..n], t_single[..n]);

    // Trusting output extends whatever strict mode produced.
    let n = whole.len().min(t_whole.len());
    assert_eq!(whole[..n], t_whole[..n]);
});
