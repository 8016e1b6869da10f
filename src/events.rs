//! Interrupt-to-main-loop hand-off.
//!
//! The UART receive context decodes command frames and parks them here; the
//! main loop drains them once per pass. Rejected frames never cross over as
//! data — only their counts do, so the main loop can log and surface a link
//! status without ever touching the decoder's scratch state.
//!
//! ```text
//! ┌──────────────┐     ┌───────────────┐     ┌──────────────┐
//! │ UART receive │────▶│  Frame Queue  │────▶│  Main Loop   │
//! │ (decoder)    │────▶│  (lock-free)  │     │  (consumer)  │
//! └──────────────┘     └───────────────┘     └──────────────┘
//!        │                                          ▲
//!        └─────── reject counters (atomics) ────────┘
//! ```

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::error::FrameError;
use crate::link::CommandFrame;

/// Maximum number of parked command frames.
/// Power of 2 for efficient ring modulo; at 9600 baud a frame takes ~4 ms
/// on the wire, so 8 slots covers several main-loop stalls' worth.
const FRAME_QUEUE_CAP: usize = 8;

// ── Lock-free SPSC frame ring ─────────────────────────────────

/// Single-producer single-consumer ring of decoded command flags bytes.
///
/// Instantiable so tests can run against a local queue; production uses the
/// [`FRAME_QUEUE`] static through the free functions below.
pub struct FrameQueue {
    head: AtomicUsize,
    tail: AtomicUsize,
    slots: [UnsafeCell<u8>; FRAME_QUEUE_CAP],
}

// SAFETY: slots are accessed under the SPSC discipline only. Producer
// (push): UART receive context — one writer, writes slots[head] then
// publishes with a Release store of head. Consumer (pop): main loop — one
// reader, observes head with Acquire before reading the slot. A slot is
// therefore never read and written concurrently.
unsafe impl Sync for FrameQueue {}

impl Default for FrameQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameQueue {
    pub const fn new() -> Self {
        Self {
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            slots: [const { UnsafeCell::new(0) }; FRAME_QUEUE_CAP],
        }
    }

    /// Park a decoded frame. Producer side only.
    /// Returns `false` if the queue is full (frame dropped).
    pub fn push(&self, frame: CommandFrame) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        let next_head = (head + 1) % FRAME_QUEUE_CAP;

        if next_head == tail {
            return false; // Queue full — drop frame.
        }

        // SAFETY: single producer; this slot is outside the readable
        // window until the Release store below.
        unsafe {
            *self.slots[head].get() = frame.flags();
        }

        self.head.store(next_head, Ordering::Release);
        true
    }

    /// Take the oldest parked frame. Consumer side only.
    pub fn pop(&self) -> Option<CommandFrame> {
        let tail = self.tail.load(Ordering::Relaxed);
        let head = self.head.load(Ordering::Acquire);

        if tail == head {
            return None; // Empty.
        }

        // SAFETY: single consumer; the Acquire load of head above
        // synchronises with the producer's Release store, so the slot
        // write is visible.
        let flags = unsafe { *self.slots[tail].get() };
        self.tail.store((tail + 1) % FRAME_QUEUE_CAP, Ordering::Release);

        Some(CommandFrame::from_flags(flags))
    }

    /// Number of parked frames.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Relaxed);
        (head + FRAME_QUEUE_CAP - tail) % FRAME_QUEUE_CAP
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The process-wide queue linking the receive context to the main loop.
static FRAME_QUEUE: FrameQueue = FrameQueue::new();

/// Park a decoded frame from the receive context.
pub fn push_frame(frame: CommandFrame) -> bool {
    let parked = FRAME_QUEUE.push(frame);
    if !parked {
        DROPPED_FRAMES.fetch_add(1, Ordering::Relaxed);
    }
    parked
}

/// Take the oldest pending frame from the main loop.
pub fn take_frame() -> Option<CommandFrame> {
    FRAME_QUEUE.pop()
}

/// Pending frame count (main-loop diagnostics).
pub fn pending_frames() -> usize {
    FRAME_QUEUE.len()
}

// ── Frame reject accounting ───────────────────────────────────
//
// Incremented in the receive context, read by the main loop. Monotonic
// wrapping counters; the main loop diffs successive reads to find new
// rejects.

static CHECKSUM_REJECTS: AtomicU32 = AtomicU32::new(0);
static FRAMING_REJECTS: AtomicU32 = AtomicU32::new(0);
static DROPPED_FRAMES: AtomicU32 = AtomicU32::new(0);

/// Record a rejected candidate frame. Receive context only.
pub fn record_frame_error(error: FrameError) {
    match error {
        FrameError::Checksum => CHECKSUM_REJECTS.fetch_add(1, Ordering::Relaxed),
        FrameError::Framing => FRAMING_REJECTS.fetch_add(1, Ordering::Relaxed),
    };
}

/// Cumulative (checksum, framing) reject counts.
pub fn frame_error_counts() -> (u32, u32) {
    (
        CHECKSUM_REJECTS.load(Ordering::Relaxed),
        FRAMING_REJECTS.load(Ordering::Relaxed),
    )
}

/// Frames lost to a full queue since boot.
pub fn dropped_frame_count() -> u32 {
    DROPPED_FRAMES.load(Ordering::Relaxed)
}
