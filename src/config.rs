// config.rs: Compile-time constants and runtime decoder options.
//
// The constants fix the sizes of the two private buffers every decoder owns
// (staging buffer and history window). `DecoderOptions` is the runtime value
// type callers pass at construction; the CLI maps its flags onto it.

// Capacity of the sliding history window in bytes.
// A power of two so window indices reduce with a mask; 64 KiB covers every
// distance a 16-bit little-endian offset can express (1..=65535).
pub const WINDOW_SIZE: usize = 1 << 16;

// Mask applied to every window index.
pub const WINDOW_MASK: usize = WINDOW_SIZE - 1;

// Default staging-buffer capacity, and the size of each refill request made
// to the source reader.
pub const INPUT_CHUNK_SIZE: usize = 128;

// Bounds for a caller-chosen staging capacity.
pub const MIN_INPUT_CHUNK_SIZE: usize = 128;
pub const MAX_INPUT_CHUNK_SIZE: usize = 1 << 20;

// Output buffer size used by the `io` helpers and the CLI for each `fill`
// call when the caller does not choose one.
pub const DEFAULT_FILL_SIZE: usize = 64 * 1024;

// ─────────────────────────────────────────────────────────────────────────────
// Strictness
// ─────────────────────────────────────────────────────────────────────────────

/// How much the decoder trusts back-reference distances found in the stream.
///
/// The wire format carries no checksum, so a distance of zero or one reaching
/// before the start of the block can only be caught by checking it against
/// the number of bytes produced so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Reject a distance of 0, or one larger than the bytes produced so far
    /// in this block, with [`DecodeError::CorruptStream`].
    ///
    /// [`DecodeError::CorruptStream`]: crate::block::DecodeError::CorruptStream
    #[default]
    Strict,
    /// Skip distance validation. Window reads stay in bounds (indices are
    /// masked); distance 0 behaves as `WINDOW_SIZE` and never-written history
    /// reads as zero bytes.
    Trusting,
}

// ─────────────────────────────────────────────────────────────────────────────
// DecoderOptions
// ─────────────────────────────────────────────────────────────────────────────

/// Construction-time options for a [`BlockDecoder`](crate::block::BlockDecoder).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    strictness: Strictness,
    input_chunk_size: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            strictness: Strictness::default(),
            input_chunk_size: INPUT_CHUNK_SIZE,
        }
    }
}

impl DecoderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select distance validation behaviour.
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Set the staging-buffer capacity, clamped into
    /// `[MIN_INPUT_CHUNK_SIZE, MAX_INPUT_CHUNK_SIZE]`.
    pub fn with_input_chunk_size(mut self, size: usize) -> Self {
        self.input_chunk_size = size.clamp(MIN_INPUT_CHUNK_SIZE, MAX_INPUT_CHUNK_SIZE);
        self
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    pub fn input_chunk_size(&self) -> usize {
        self.input_chunk_size
    }
}
