//! Local-link frame assembler.
//!
//! The pairing channel is a byte stream (short-range serial link) carrying
//! newline-delimited JSON records. This module accumulates raw bytes into
//! complete frames:
//!
//! ```text
//!   bytes ──▶ FrameAssembler::feed ──▶ Option<complete frame>
//! ```
//!
//! Two protections keep a half-open or hostile peer from wedging the
//! channel:
//!
//! - **Staleness reset** — a gap longer than `stale_ms` between bytes
//!   discards the pending partial frame before the new byte is appended.
//!   A half-received frame after a long silence is garbage, never delivered.
//! - **Size cap** — once the buffer holds `max_bytes`, further bytes are
//!   dropped (the buffer is *not* reset), so an unterminated flood costs
//!   bounded memory. The eventual `\n` still delivers the truncated frame;
//!   the router's soft-fail decode turns it into a `success:false` reply.

use log::warn;

/// Streaming assembler for newline-delimited local-link frames.
pub struct FrameAssembler {
    buf: Vec<u8>,
    /// Timestamp (ms) of the most recently accepted byte.
    last_byte_ms: u64,
    max_bytes: usize,
    stale_ms: u64,
    /// Set while the current frame is overflowing, for one log line per frame.
    overflowed: bool,
}

impl FrameAssembler {
    pub fn new(max_bytes: usize, stale_ms: u64) -> Self {
        Self {
            buf: Vec::new(),
            last_byte_ms: 0,
            max_bytes,
            stale_ms,
            overflowed: false,
        }
    }

    /// Feed one byte received at `now_ms`.
    ///
    /// Returns the completed frame (without the terminator) when `byte`
    /// is `\n`, otherwise `None`. The returned frame may be empty or
    /// truncated — delivery is the router's problem, framing isn't.
    pub fn feed(&mut self, now_ms: u64, byte: u8) -> Option<Vec<u8>> {
        if !self.buf.is_empty() && now_ms.saturating_sub(self.last_byte_ms) > self.stale_ms {
            warn!(
                "link: discarding {} stale byte(s) after {}ms gap",
                self.buf.len(),
                now_ms.saturating_sub(self.last_byte_ms)
            );
            self.buf.clear();
            self.overflowed = false;
        }
        self.last_byte_ms = now_ms;

        if byte == b'\n' {
            self.overflowed = false;
            return Some(core::mem::take(&mut self.buf));
        }

        if self.buf.len() < self.max_bytes {
            self.buf.push(byte);
        } else if !self.overflowed {
            self.overflowed = true;
            warn!("link: frame exceeds {} bytes, truncating", self.max_bytes);
        }
        None
    }

    /// Bytes currently pending (no terminator seen yet).
    pub fn pending_len(&self) -> usize {
        self.buf.len()
    }
}

// ── Tests ────────────────────────────────────────────────────
