//! Sliding history window.
//!
//! A fixed-capacity circular buffer mirroring the most recent output of a
//! block. The decoder records every byte it hands to the caller, so a match
//! can reach back past the start of the caller's current buffer, whatever
//! chunking the caller uses.
//!
//! All index arithmetic goes through [`SlidingWindow::slot`].

use crate::config::{WINDOW_MASK, WINDOW_SIZE};

pub struct SlidingWindow {
    buf: Box<[u8]>,
    /// Next slot to be written, always `< WINDOW_SIZE`.
    write_pos: usize,
    /// Bytes recorded since construction or the last `clear`.
    total: u64,
}

impl SlidingWindow {
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; WINDOW_SIZE].into_boxed_slice(),
            write_pos: 0,
            total: 0,
        }
    }

    /// Buffer index of the byte `distance` positions behind the write cursor.
    /// A distance of 0 is congruent to `WINDOW_SIZE`.
    #[inline]
    fn slot(&self, distance: usize) -> usize {
        self.write_pos.wrapping_sub(distance) & WINDOW_MASK
    }

    /// Append `bytes`, overwriting the oldest history once the window is full.
    pub fn record(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.total += bytes.len() as u64;

        // Only the last WINDOW_SIZE bytes can survive; skip the rest but keep
        // the cursor where a full write would have left it.
        let skipped = bytes.len().saturating_sub(WINDOW_SIZE);
        let tail = &bytes[skipped..];
        self.write_pos = (self.write_pos + skipped) & WINDOW_MASK;

        let first = tail.len().min(WINDOW_SIZE - self.write_pos);
        self.buf[self.write_pos..self.write_pos + first].copy_from_slice(&tail[..first]);
        let rest = tail.len() - first;
        self.buf[..rest].copy_from_slice(&tail[first..]);

        self.write_pos = (self.write_pos + tail.len()) & WINDOW_MASK;
    }

    /// The byte recorded `distance` positions ago (1 = most recent).
    #[cfg(test)]
    fn byte_at(&self, distance: usize) -> u8 {
        self.buf[self.slot(distance)]
    }

    /// Copy `out.len()` bytes of history starting `distance` bytes behind the
    /// write cursor.
    ///
    /// The copied range must not run into bytes that are not recorded yet,
    /// i.e. `out.len() <= distance` (with 0 meaning `WINDOW_SIZE`). Longer,
    /// self-overlapping matches are produced in chunks, recording each chunk
    /// before reading the next.
    pub fn read_back(&self, distance: usize, out: &mut [u8]) {
        debug_assert!(out.len() <= effective_distance(distance));
        let start = self.slot(distance);
        let first = out.len().min(WINDOW_SIZE - start);
        out[..first].copy_from_slice(&self.buf[start..start + first]);
        let rest = out.len() - first;
        out[first..].copy_from_slice(&self.buf[..rest]);
    }

    /// Number of history bytes addressable by distance.
    #[inline]
    pub fn available(&self) -> usize {
        self.total.min(WINDOW_SIZE as u64) as usize
    }

    /// Bytes recorded since construction or the last [`clear`](Self::clear).
    #[inline]
    pub fn total_recorded(&self) -> u64 {
        self.total
    }

    /// Forget all history. The buffer is kept and zeroed, so a trusting
    /// decoder reading before the block start sees zeros, never stale bytes
    /// from a previous block.
    pub fn clear(&mut self) {
        self.buf.fill(0);
        self.write_pos = 0;
        self.total = 0;
    }
}

impl Default for SlidingWindow {
    fn default() -> Self {
        Self::new()
    }
}

/// A wire distance of 0 addresses the same slot as `WINDOW_SIZE`.
#[inline]
pub(crate) fn effective_distance(distance: usize) -> usize {
    if distance == 0 {
        WINDOW_SIZE
    } else {
        distance
    }
}
