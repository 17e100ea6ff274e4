//! Block wire constants, resumable decoder state, and the decode error type.
//!
//!   - Token layout constants (`ML_BITS`, `ML_MASK`, `RUN_MASK`, `MINMATCH`)
//!   - [`Phase`]: the point the token decoder resumes from
//!   - [`DecoderState`]: everything needed to suspend mid-token
//!   - [`DecodeError`]: recoverable decode failures

use std::io;

use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Wire constants
// ─────────────────────────────────────────────────────────────────────────────

/// Bits of the token holding the match-length code (low nibble).
pub const ML_BITS: u32 = 4;
pub const ML_MASK: u8 = (1u8 << ML_BITS) - 1;
pub const RUN_BITS: u32 = 8 - ML_BITS;
/// Literal-length code that announces extension bytes (high nibble).
pub const RUN_MASK: u8 = (1u8 << RUN_BITS) - 1;

/// Minimum match length; added to the low nibble of every token.
pub const MINMATCH: usize = 4;

/// An extension byte with this value is followed by another extension byte.
pub const LENGTH_CONTINUE: u8 = 255;

/// Largest distance a 16-bit offset field can carry.
pub const MAX_DISTANCE: usize = u16::MAX as usize;

/// Literal-run length code of a token.
#[inline]
pub fn literal_code(token: u8) -> u8 {
    token >> ML_BITS
}

/// Match-length code of a token (before adding [`MINMATCH`]).
#[inline]
pub fn match_code(token: u8) -> u8 {
    token & ML_MASK
}

// ─────────────────────────────────────────────────────────────────────────────
// Phase / DecoderState
// ─────────────────────────────────────────────────────────────────────────────

/// The step of token interpretation the decoder resumes into on the next
/// `fill` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Next input byte is a token.
    #[default]
    AwaitToken,
    /// Literal code was 15; reading 255-continued extension bytes.
    AwaitExtendedLiteralLength,
    /// Copying `literal_len_remaining` bytes from input to output.
    EmitLiteral,
    /// Reading the two distance bytes (the first may already be stashed).
    AwaitMatchDistance,
    /// Match code was 15; reading 255-continued extension bytes.
    AwaitExtendedMatchLength,
    /// Copying `match_len_remaining` bytes from history to output.
    EmitMatch,
}

/// Resumable machine state. Plain integers only, so a suspension point can
/// sit anywhere inside a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecoderState {
    pub phase: Phase,
    /// Token of the sequence being decoded.
    pub token: u8,
    pub literal_len_remaining: usize,
    pub match_len_remaining: usize,
    /// 1-based distance back from the current output position.
    pub match_distance: usize,
    /// Low byte of a distance whose high byte has not arrived yet.
    pub distance_low: Option<u8>,
}

impl DecoderState {
    /// Start a new sequence from `token`.
    #[inline]
    pub fn begin_sequence(&mut self, token: u8) {
        self.token = token;
        self.literal_len_remaining = literal_code(token) as usize;
        self.match_len_remaining = match_code(token) as usize + MINMATCH;
        self.match_distance = 0;
        self.distance_low = None;
        self.phase = if literal_code(token) == RUN_MASK {
            Phase::AwaitExtendedLiteralLength
        } else {
            Phase::EmitLiteral
        };
    }

    /// Whether the current token's match length carries extension bytes.
    #[inline]
    pub fn has_extended_match(&self) -> bool {
        match_code(self.token) == ML_MASK
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DecodeError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors returned by [`BlockDecoder::fill`](super::BlockDecoder::fill).
///
/// Truncated input is not an error: the decoder stops and reports the bytes
/// produced so far.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A back-reference distance of zero, or one reaching before the first
    /// byte of the block. Only raised under `Strictness::Strict`.
    #[error("corrupt stream: match distance {distance} with {available} bytes of history")]
    CorruptStream { distance: usize, available: u64 },

    /// `fill` was called after `release` without a new source being bound.
    #[error("decoder has no bound source")]
    Released,

    /// The source reader (or, in the `io` helpers, the destination) failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<DecodeError> for io::Error {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::Io(e) => e,
            DecodeError::CorruptStream { .. } => io::Error::new(io::ErrorKind::InvalidData, err),
            DecodeError::Released => io::Error::new(io::ErrorKind::NotConnected, err),
        }
    }
}
