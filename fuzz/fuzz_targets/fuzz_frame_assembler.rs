//! Fuzz target: `FrameAssembler::feed`
//!
//! Drives arbitrary byte sequences into the streaming frame assembler
//! and asserts that it never panics, never delivers a frame above the
//! size cap, and never retains more than the cap between terminators.
//!
//! cargo fuzz run fuzz_frame_assembler

#![no_main]

use homelight::link::FrameAssembler;
use libfuzzer_sys::fuzz_target;

const MAX_FRAME: usize = 4096;

fuzz_target!(|data: &[u8]| {
    let mut assembler = FrameAssembler::new(MAX_FRAME, 3000);

    // Reuse input bytes as timestamp jitter so the staleness reset is
    // exercised alongside the cap.
    let mut now: u64 = 0;
    for byte in data {
        now += u64::from(*byte >> 4) * 500;
        if let Some(frame) = assembler.feed(now, *byte) {
            assert!(frame.len() <= MAX_FRAME, "frame exceeds size cap");
        }
        assert!(assembler.pending_len() <= MAX_FRAME, "buffer exceeds size cap");
    }
});
