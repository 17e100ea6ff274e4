//! Streaming block decompression.
//!
//! A block is a sequence of (literal run, back-reference) pairs ending in a
//! literal-only sequence. [`BlockDecoder`] inflates one block at a time into
//! caller buffers of any size, resuming mid-token between calls.

pub mod decoder;
pub mod staging;
pub mod types;
pub mod window;

// Re-export the most important public API items at the module level.
pub use decoder::BlockDecoder;
pub use staging::InputStaging;
pub use types::{DecodeError, DecoderState, Phase, MAX_DISTANCE, MINMATCH};
pub use window::SlidingWindow;
