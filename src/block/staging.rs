//! Input staging buffer over a blocking byte source.
//!
//! The token decoder needs to look at compressed input one byte at a time
//! (tokens, extension bytes, distance halves). Reading the source per byte
//! would be ruinous, so input is pulled in chunks into a small private
//! buffer and handed out from there.
//!
//! # Source contract
//!
//! Any [`Read`]: `read` may return fewer bytes than requested, and a return
//! of zero is final end-of-input. `Interrupted` is retried; every other error
//! propagates.
//!
//! # Known-length mode
//!
//! When the compressed length of the block is known, no read ever asks for
//! more than the bytes left in the block, so whatever follows the block in
//! the same source stays unread.

use std::io::{self, Read};

use super::types::DecodeError;

pub struct InputStaging<R> {
    source: Option<R>,
    buf: Box<[u8]>,
    /// Unconsumed bytes are `buf[pos..end]`.
    pos: usize,
    end: usize,
    /// Bytes of the block not yet requested from the source (known-length mode).
    remaining: Option<u64>,
    /// Set once the source returned 0; no further reads are issued.
    exhausted: bool,
    /// Bytes handed to the decoder since the last rebind.
    consumed: u64,
    /// Source error hit after `next_bytes` had already copied something;
    /// returned by the next refill.
    pending: Option<DecodeError>,
}

impl<R: Read> InputStaging<R> {
    pub fn new(source: R, compressed_len: Option<u64>, capacity: usize) -> Self {
        Self {
            source: Some(source),
            buf: vec![0u8; capacity].into_boxed_slice(),
            pos: 0,
            end: 0,
            remaining: compressed_len,
            exhausted: false,
            consumed: 0,
            pending: None,
        }
    }

    /// Next compressed byte, or `None` at end of input.
    #[inline]
    pub fn next_byte(&mut self) -> Result<Option<u8>, DecodeError> {
        if self.pos == self.end && !self.refill()? {
            return Ok(None);
        }
        let b = self.buf[self.pos];
        self.pos += 1;
        self.consumed += 1;
        Ok(Some(b))
    }

    /// Copy up to `dst.len()` compressed bytes into `dst`.
    ///
    /// Returns fewer than `dst.len()` when input is exhausted, or when the
    /// source failed after some bytes were copied. In the latter case the
    /// error is held back and returned by the next call.
    pub fn next_bytes(&mut self, dst: &mut [u8]) -> Result<usize, DecodeError> {
        let mut copied = 0;
        while copied < dst.len() {
            if self.pos == self.end {
                match self.refill() {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(err) if copied > 0 => {
                        self.pending = Some(err);
                        break;
                    }
                    Err(err) => return Err(err),
                }
            }
            let n = (self.end - self.pos).min(dst.len() - copied);
            dst[copied..copied + n].copy_from_slice(&self.buf[self.pos..self.pos + n]);
            self.pos += n;
            copied += n;
        }
        self.consumed += copied as u64;
        Ok(copied)
    }

    /// Pull the next chunk from the source. Only called with the buffer
    /// drained. Returns `false` at end of input.
    fn refill(&mut self) -> Result<bool, DecodeError> {
        debug_assert_eq!(self.pos, self.end);
        if let Some(err) = self.pending.take() {
            return Err(err);
        }
        self.pos = 0;
        self.end = 0;
        if self.exhausted {
            return Ok(false);
        }
        let want = match self.remaining {
            Some(0) => {
                self.exhausted = true;
                return Ok(false);
            }
            Some(left) => self.buf.len().min(usize::try_from(left).unwrap_or(usize::MAX)),
            None => self.buf.len(),
        };
        let Some(source) = self.source.as_mut() else {
            return Err(DecodeError::Released);
        };

        let n = loop {
            match source.read(&mut self.buf[..want]) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(DecodeError::Io(e)),
            }
        };
        if n == 0 {
            tracing::trace!(consumed = self.consumed, "compressed source exhausted");
            self.exhausted = true;
            return Ok(false);
        }
        if let Some(left) = self.remaining.as_mut() {
            *left -= n as u64;
        }
        self.end = n;
        Ok(true)
    }

    /// Bind a new source and block length, keeping the buffer allocation.
    /// Returns the previously bound source.
    pub fn rebind(&mut self, source: R, compressed_len: Option<u64>) -> Option<R> {
        let previous = self.source.replace(source);
        self.clear_cursors();
        self.remaining = compressed_len;
        previous
    }

    /// Unbind and return the source; cursors are zeroed and any buffered
    /// bytes are dropped.
    pub fn release(&mut self) -> Option<R> {
        self.clear_cursors();
        self.remaining = None;
        self.source.take()
    }

    fn clear_cursors(&mut self) {
        self.pos = 0;
        self.end = 0;
        self.exhausted = false;
        self.consumed = 0;
        self.pending = None;
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.source.is_some()
    }

    /// Bytes staged but not yet consumed.
    #[inline]
    pub fn buffered(&self) -> usize {
        self.end - self.pos
    }

    /// Compressed bytes consumed since the last rebind.
    #[inline]
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    pub fn into_source(self) -> Option<R> {
        self.source
    }
}
