//! Fuzz target: `CommandDecoder::feed`
//!
//! Drives arbitrary byte sequences through the streaming command frame
//! decoder one byte at a time and asserts that it never panics, never
//! yields a frame carrying reserved flag bits, and recovers cleanly
//! after a reset.
//!
//! cargo fuzz run fuzz_command_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use stericab::link::{CommandDecoder, FrameEvent};

fuzz_target!(|data: &[u8]| {
    let mut decoder = CommandDecoder::new();

    let mut events = 0usize;
    for &byte in data {
        match decoder.feed(byte) {
            FrameEvent::None => {}
            FrameEvent::Ready(frame) => {
                events += 1;
                assert_eq!(
                    frame.flags() & !0x1F,
                    0,
                    "reserved bits must be dropped on unpack"
                );
            }
            FrameEvent::Rejected(_) => events += 1,
        }
    }

    // A frame costs four bytes on the wire; the decoder cannot report
    // more candidates than the stream could hold.
    assert!(events <= data.len() / 4, "event count exceeds byte budget");

    // After a reset the decoder must accept bytes cleanly again.
    decoder.reset();
    for &byte in data {
        let _ = decoder.feed(byte);
    }
});
