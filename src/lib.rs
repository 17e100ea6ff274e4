// lzstream: resumable streaming decoder for LZ-compressed blocks

pub mod block;
pub mod cli;
pub mod config;
pub mod io;

// ── Version constants ─────────────────────────────────────────────────────────
pub const VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

/// Returns the crate version string.
pub fn version_string() -> &'static str {
    VERSION_STRING
}

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use block::{BlockDecoder, DecodeError};
pub use config::{DecoderOptions, Strictness};
