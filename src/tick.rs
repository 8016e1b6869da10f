//! 1 kHz tick scheduler.
//!
//! All timing in the control core derives from one millisecond interrupt.
//! The interrupt side ([`TickScheduler::on_tick`]) advances counters and
//! raises the due flag; the main loop consumes the flag and reads counters.
//! Every field is a single atomic word, so no lock and no interrupt
//! masking is needed on either side.
//!
//! Field discipline:
//! - counters are written in tick context; the main loop only reads them
//! - the due flag is set in tick context and cleared only by
//!   [`TickScheduler::take_due`]
//! - the dwell latch is written by the main loop (policy) and read in tick
//!   context
//!
//! Mode-scoped timers (Auto due cadence, Auto dwell, Cycle phase) are held
//! at zero whenever their mode is not current, so re-entering a mode always
//! starts its timing fresh. That zeroing happens here, in tick context, not
//! in the mode transition, which keeps the transition path free of timer
//! bookkeeping.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::mode::OperatingMode;

/// Tick rate of the scheduler interrupt.
pub const TICK_HZ: u32 = 1_000;
/// Spacing of due-flag work packages in Auto mode.
pub const DUE_PERIOD_MS: u32 = 100;
/// Full period of the Cycle mode square wave.
pub const CYCLE_PERIOD_MS: u32 = 15_000;
/// ON portion at the start of each Cycle period.
pub const CYCLE_ON_MS: u32 = 5_000;
/// Forced lamp-on/door-open window after a proximity edge in Auto.
pub const DWELL_WINDOW_MS: u32 = 2_000;

/// Atomic scheduler state shared between tick interrupt and main loop.
///
/// `const fn new` so the production instance can live in a `static`
/// reachable from the timer callback; tests construct their own locals.
pub struct TickScheduler {
    millis: AtomicU32,
    ms_into_second: AtomicU32,
    seconds: AtomicU32,
    due_cadence_ms: AtomicU32,
    due: AtomicBool,
    dwell_active: AtomicBool,
    dwell_ms: AtomicU32,
    cycle_phase_ms: AtomicU32,
}

/// The production scheduler instance, shared with the timer callback.
pub static TICK: TickScheduler = TickScheduler::new();

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler {
    pub const fn new() -> Self {
        Self {
            millis: AtomicU32::new(0),
            ms_into_second: AtomicU32::new(0),
            seconds: AtomicU32::new(0),
            due_cadence_ms: AtomicU32::new(0),
            due: AtomicBool::new(false),
            dwell_active: AtomicBool::new(false),
            dwell_ms: AtomicU32::new(0),
            cycle_phase_ms: AtomicU32::new(0),
        }
    }

    /// Advance one millisecond. Tick interrupt context only.
    ///
    /// `mode` is the published operating mode; passing it in keeps this
    /// testable without touching process statics.
    pub fn on_tick(&self, mode: OperatingMode) {
        self.millis.fetch_add(1, Ordering::Relaxed);

        let into = self.ms_into_second.load(Ordering::Relaxed) + 1;
        if into >= 1_000 {
            self.ms_into_second.store(0, Ordering::Relaxed);
            self.seconds.fetch_add(1, Ordering::Relaxed);
        } else {
            self.ms_into_second.store(into, Ordering::Relaxed);
        }

        match mode {
            OperatingMode::Auto => {
                if self.dwell_active.load(Ordering::Acquire) {
                    let dwell = self.dwell_ms.load(Ordering::Relaxed) + 1;
                    self.dwell_ms.store(dwell, Ordering::Relaxed);
                    if dwell == DWELL_WINDOW_MS {
                        // Expiry gets its own due so the window closes on
                        // time rather than at the next cadence boundary.
                        self.due.store(true, Ordering::Release);
                    }
                }

                let cadence = self.due_cadence_ms.load(Ordering::Relaxed) + 1;
                if cadence >= DUE_PERIOD_MS {
                    self.due_cadence_ms.store(0, Ordering::Relaxed);
                    self.due.store(true, Ordering::Release);
                } else {
                    self.due_cadence_ms.store(cadence, Ordering::Relaxed);
                }

                self.cycle_phase_ms.store(0, Ordering::Relaxed);
            }
            OperatingMode::Cycle => {
                let mut phase = self.cycle_phase_ms.load(Ordering::Relaxed) + 1;
                if phase >= CYCLE_PERIOD_MS {
                    phase = 0;
                }
                self.cycle_phase_ms.store(phase, Ordering::Relaxed);
                if phase % DUE_PERIOD_MS == 0 {
                    // Includes the wrap point, so the ON edge of a new
                    // period is evaluated immediately.
                    self.due.store(true, Ordering::Release);
                }

                self.due_cadence_ms.store(0, Ordering::Relaxed);
                self.dwell_ms.store(0, Ordering::Relaxed);
            }
            OperatingMode::Manual | OperatingMode::Remote => {
                self.due_cadence_ms.store(0, Ordering::Relaxed);
                self.dwell_ms.store(0, Ordering::Relaxed);
                self.cycle_phase_ms.store(0, Ordering::Relaxed);
            }
        }
    }

    /// Consume the due flag. Main loop only; returns whether work is due.
    pub fn take_due(&self) -> bool {
        self.due.swap(false, Ordering::AcqRel)
    }

    /// Start (or restart) the dwell window at zero. Main loop only.
    pub fn latch_dwell(&self) {
        // Drop the latch before zeroing so a tick landing between these
        // stores cannot advance a stale count into the new window.
        self.dwell_active.store(false, Ordering::Relaxed);
        self.dwell_ms.store(0, Ordering::Relaxed);
        self.dwell_active.store(true, Ordering::Release);
    }

    /// Stop dwell accumulation. Main loop only.
    pub fn clear_dwell(&self) {
        self.dwell_active.store(false, Ordering::Release);
    }

    pub fn dwell_active(&self) -> bool {
        self.dwell_active.load(Ordering::Acquire)
    }

    /// Milliseconds accumulated in the current dwell window.
    pub fn dwell_millis(&self) -> u32 {
        self.dwell_ms.load(Ordering::Relaxed)
    }

    /// Milliseconds into the current Cycle period.
    pub fn cycle_phase_millis(&self) -> u32 {
        self.cycle_phase_ms.load(Ordering::Relaxed)
    }

    /// Wrapping milliseconds since boot.
    pub fn millis(&self) -> u32 {
        self.millis.load(Ordering::Relaxed)
    }

    /// Whole seconds since boot.
    pub fn seconds(&self) -> u32 {
        self.seconds.load(Ordering::Relaxed)
    }
}
