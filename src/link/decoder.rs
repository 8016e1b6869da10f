//! Incremental decoder for inbound command frames.
//!
//! Runs in the UART receive context, one byte per call. The scratch buffer
//! and state are owned here exclusively; the main loop only ever sees
//! completed [`CommandFrame`]s through the frame queue, so there is no
//! shared-buffer tearing to defend against.
//!
//! Resynchronization: while hunting for a header every byte that is not
//! `0xA5` is discarded. Once a candidate frame is underway, any validation
//! failure on the fourth byte drops the whole candidate and returns to
//! header hunting; the dropped bytes are not replayed. With no length field
//! on the wire this is the only recovery there is, and it is enough: the
//! next genuine header restores lock within one frame.

use super::{checksum, CommandFrame, FrameEvent, COMMAND_FRAME_LEN, FRAME_HEADER, FRAME_TRAILER};
use crate::error::FrameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Discarding bytes until a header appears.
    AwaitHeader,
    /// Header seen; collecting the remaining frame bytes.
    Accumulating,
}

/// Per-byte command frame decoder.
#[derive(Debug)]
pub struct CommandDecoder {
    state: DecodeState,
    buf: [u8; COMMAND_FRAME_LEN],
    filled: usize,
}

impl Default for CommandDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandDecoder {
    pub const fn new() -> Self {
        Self {
            state: DecodeState::AwaitHeader,
            buf: [0; COMMAND_FRAME_LEN],
            filled: 0,
        }
    }

    /// Drop any partial frame and return to header hunting.
    pub fn reset(&mut self) {
        self.state = DecodeState::AwaitHeader;
        self.filled = 0;
    }

    /// Feed one received byte.
    ///
    /// Returns [`FrameEvent::Ready`] exactly once per well-formed frame on
    /// its final byte, [`FrameEvent::Rejected`] once per malformed
    /// candidate, and [`FrameEvent::None`] otherwise. Never panics on any
    /// input sequence.
    pub fn feed(&mut self, byte: u8) -> FrameEvent {
        match self.state {
            DecodeState::AwaitHeader => {
                if byte == FRAME_HEADER {
                    self.buf[0] = byte;
                    self.filled = 1;
                    self.state = DecodeState::Accumulating;
                }
                FrameEvent::None
            }
            DecodeState::Accumulating => {
                self.buf[self.filled] = byte;
                self.filled += 1;
                if self.filled < COMMAND_FRAME_LEN {
                    return FrameEvent::None;
                }

                // Frame complete; all outcomes return to header hunting.
                self.reset();

                let flags = self.buf[1];
                let sum = self.buf[2];
                let trailer = self.buf[3];

                if trailer != FRAME_TRAILER {
                    return FrameEvent::Rejected(FrameError::Framing);
                }
                if sum != checksum(&[flags]) {
                    return FrameEvent::Rejected(FrameError::Checksum);
                }
                FrameEvent::Ready(CommandFrame::from_flags(flags))
            }
        }
    }
}
