//! Resumable streaming block decoder.
//!
//! [`BlockDecoder::fill`] inflates one compressed block into caller-owned
//! buffers of any size, one call at a time. A token, an extension-length
//! run, a distance field, or a literal/match copy may straddle any number of
//! calls: the decoder records the [`Phase`] it stopped in plus the remaining
//! counts, and the next call picks up from there.
//!
//! # Sequence layout
//!
//! ```text
//! token | [lit ext…] | literals | dist lo | dist hi | [match ext…]
//! ```
//!
//! High nibble of the token is the literal length (15 = extension bytes
//! follow, each adding its value, 255 = another follows). Low nibble plus 4
//! is the match length, extended the same way when the nibble is 15. The last
//! sequence of a block is literal-only: input ends where a distance would
//! start.
//!
//! # Control flow
//!
//! `fill` is a `loop { match phase { … } }`. Every arm either advances to
//! the next phase or stops the loop because the output is full or input is
//! exhausted; nothing is held on the stack across calls.
//!
//! # Malformed input
//!
//! Truncation anywhere is end-of-stream: the bytes decoded so far are
//! returned and later calls return 0. A bad distance is a
//! [`DecodeError::CorruptStream`] under [`Strictness::Strict`]; see
//! [`Strictness`] for the trusting behaviour.

use std::io::{self, Read};

use super::staging::InputStaging;
use super::types::{DecodeError, DecoderState, Phase, LENGTH_CONTINUE};
use super::window::{effective_distance, SlidingWindow};
use crate::config::{DecoderOptions, Strictness};

/// A back-reference rejected under strict validation. Kept so the error is
/// reported again on every later call until `reset`.
#[derive(Debug, Clone, Copy)]
struct Corruption {
    distance: usize,
    available: u64,
}

impl Corruption {
    fn error(self) -> DecodeError {
        DecodeError::CorruptStream {
            distance: self.distance,
            available: self.available,
        }
    }
}

/// Streaming decoder for one compressed block at a time.
///
/// The decoder borrows nothing itself; pass `&mut reader` as `R` to keep
/// ownership of the source with the caller.
pub struct BlockDecoder<R> {
    input: InputStaging<R>,
    window: SlidingWindow,
    state: DecoderState,
    options: DecoderOptions,
    corruption: Option<Corruption>,
    /// An error hit after some bytes were already produced in the same call;
    /// returned by the next call.
    pending: Option<DecodeError>,
}

impl<R: Read> BlockDecoder<R> {
    /// Decoder over a block whose compressed length is unknown: input ends
    /// when the source does.
    pub fn new(source: R) -> Self {
        Self::with_options(source, None, DecoderOptions::default())
    }

    /// Decoder over a block of exactly `compressed_len` bytes. The source is
    /// never read past the block.
    pub fn with_compressed_len(source: R, compressed_len: u64) -> Self {
        Self::with_options(source, Some(compressed_len), DecoderOptions::default())
    }

    pub fn with_options(source: R, compressed_len: Option<u64>, options: DecoderOptions) -> Self {
        Self {
            input: InputStaging::new(source, compressed_len, options.input_chunk_size()),
            window: SlidingWindow::new(),
            state: DecoderState::default(),
            options,
            corruption: None,
            pending: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Steady state
    // ─────────────────────────────────────────────────────────────────────────

    /// Decode into `out`, returning the number of bytes written.
    ///
    /// The result is `out.len()` unless the block's input is exhausted. An
    /// empty `out` returns 0 without reading input.
    pub fn fill(&mut self, out: &mut [u8]) -> Result<usize, DecodeError> {
        if !self.input.is_bound() {
            return Err(DecodeError::Released);
        }
        if let Some(err) = self.pending.take() {
            return Err(err);
        }
        if let Some(c) = self.corruption {
            return Err(c.error());
        }

        let mut written = 0;
        match self.decode_into(out, &mut written) {
            Ok(()) => Ok(written),
            Err(err) if written > 0 => {
                // Hand back what was produced; the error surfaces next call.
                // Corruption is sticky on its own.
                if !matches!(err, DecodeError::CorruptStream { .. }) {
                    self.pending = Some(err);
                }
                Ok(written)
            }
            Err(err) => Err(err),
        }
    }

    fn decode_into(&mut self, out: &mut [u8], written: &mut usize) -> Result<(), DecodeError> {
        while *written < out.len() {
            match self.state.phase {
                Phase::AwaitToken => {
                    let Some(token) = self.input.next_byte()? else {
                        break;
                    };
                    self.state.begin_sequence(token);
                }

                Phase::AwaitExtendedLiteralLength => {
                    let Some(b) = self.input.next_byte()? else {
                        break;
                    };
                    self.state.literal_len_remaining =
                        self.state.literal_len_remaining.saturating_add(b as usize);
                    if b != LENGTH_CONTINUE {
                        self.state.phase = Phase::EmitLiteral;
                    }
                }

                Phase::EmitLiteral => {
                    if self.state.literal_len_remaining == 0 {
                        self.state.phase = Phase::AwaitMatchDistance;
                        continue;
                    }
                    let want = self.state.literal_len_remaining.min(out.len() - *written);
                    let dst = &mut out[*written..*written + want];
                    let n = self.input.next_bytes(dst)?;
                    self.window.record(&dst[..n]);
                    *written += n;
                    self.state.literal_len_remaining -= n;
                    if n < want {
                        break;
                    }
                }

                Phase::AwaitMatchDistance => {
                    // End of input here is the normal end of a block.
                    let Some(b) = self.input.next_byte()? else {
                        break;
                    };
                    let Some(low) = self.state.distance_low.take() else {
                        self.state.distance_low = Some(b);
                        continue;
                    };
                    let distance = u16::from_le_bytes([low, b]) as usize;
                    self.state.match_distance = self.accept_distance(distance)?;
                    self.state.phase = if self.state.has_extended_match() {
                        Phase::AwaitExtendedMatchLength
                    } else {
                        Phase::EmitMatch
                    };
                }

                Phase::AwaitExtendedMatchLength => {
                    let Some(b) = self.input.next_byte()? else {
                        break;
                    };
                    self.state.match_len_remaining =
                        self.state.match_len_remaining.saturating_add(b as usize);
                    if b != LENGTH_CONTINUE {
                        self.state.phase = Phase::EmitMatch;
                    }
                }

                Phase::EmitMatch => {
                    if self.state.match_len_remaining == 0 {
                        self.state.phase = Phase::AwaitToken;
                        continue;
                    }
                    *written += self.copy_match(out, *written);
                }
            }
        }
        Ok(())
    }

    /// Validate a wire distance and return the distance to copy from.
    fn accept_distance(&mut self, distance: usize) -> Result<usize, DecodeError> {
        match self.options.strictness() {
            Strictness::Trusting => Ok(effective_distance(distance)),
            Strictness::Strict => {
                // Distances never exceed the window, so bytes still addressable
                // and bytes produced in this block agree.
                let available = self.window.available() as u64;
                if distance == 0 || distance as u64 > available {
                    tracing::warn!(distance, available, "match distance outside block history");
                    let c = Corruption { distance, available };
                    self.corruption = Some(c);
                    return Err(c.error());
                }
                Ok(distance)
            }
        }
    }

    /// Emit the next piece of the current match at `out[start..]`; returns
    /// the number of bytes written.
    ///
    /// When the source lies inside what this call already wrote, the copy
    /// runs inside `out`, doubling the chunk each pass so a short distance
    /// still repeats correctly. Otherwise at most `distance` bytes come from
    /// the window, so the source never runs into bytes not yet recorded.
    fn copy_match(&mut self, out: &mut [u8], start: usize) -> usize {
        let distance = self.state.match_distance;
        let len = self.state.match_len_remaining.min(out.len() - start);

        let n = if distance <= start {
            let origin = start - distance;
            let end = start + len;
            let mut pos = start;
            while pos < end {
                // `pos - origin` stays a multiple of `distance`.
                let chunk = (pos - origin).min(end - pos);
                out.copy_within(origin..origin + chunk, pos);
                pos += chunk;
            }
            len
        } else {
            let n = len.min(distance);
            self.window.read_back(distance, &mut out[start..start + n]);
            n
        };

        self.window.record(&out[start..start + n]);
        self.state.match_len_remaining -= n;
        n
    }

    /// Decode a single byte; `None` at end of block.
    pub fn read_byte(&mut self) -> Result<Option<u8>, DecodeError> {
        let mut b = [0u8; 1];
        Ok((self.fill(&mut b)? == 1).then_some(b[0]))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Rebind to a new block, reusing the staging buffer and window.
    ///
    /// History, state, and any recorded failure are cleared. Returns the
    /// previously bound source, if any.
    pub fn reset(&mut self, source: R, compressed_len: Option<u64>) -> Option<R> {
        tracing::debug!(
            ?compressed_len,
            produced = self.total_out(),
            dropped = self.input.buffered(),
            "decoder reset"
        );
        let previous = self.input.rebind(source, compressed_len);
        self.clear_state();
        previous
    }

    /// Unbind and return the source. Subsequent `fill` calls fail with
    /// [`DecodeError::Released`] until [`reset`](Self::reset).
    pub fn release(&mut self) -> Option<R> {
        tracing::debug!(
            produced = self.total_out(),
            dropped = self.input.buffered(),
            "decoder released"
        );
        let source = self.input.release();
        self.clear_state();
        source
    }

    fn clear_state(&mut self) {
        self.window.clear();
        self.state = DecoderState::default();
        self.corruption = None;
        self.pending = None;
    }

    pub fn into_inner(self) -> Option<R> {
        self.input.into_source()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Compressed bytes consumed from the current block.
    pub fn total_in(&self) -> u64 {
        self.input.consumed()
    }

    /// Decompressed bytes produced for the current block.
    pub fn total_out(&self) -> u64 {
        self.window.total_recorded()
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    pub fn is_bound(&self) -> bool {
        self.input.is_bound()
    }
}

impl<R: Read> Read for BlockDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.fill(buf)?)
    }
}
