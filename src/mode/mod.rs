//! Operating mode coordinator.
//!
//! ```text
//!        key 16 / frame mode_toggle
//!   ┌─────────┐    ┌─────────┐    ┌─────────┐    ┌─────────┐
//!   │ Manual  │───▶│  Auto   │───▶│  Cycle  │───▶│ Remote  │
//!   └─────────┘    └─────────┘    └─────────┘    └─────────┘
//!        ▲                                            │
//!        └────────────────────────────────────────────┘
//! ```
//!
//! The rotation is forward-only and total: one trigger, one step, from
//! either input path. The mode is a closed enum and both the transition
//! and the per-mode policy are single exhaustive `match`es, so adding a
//! mode without deciding its cleanup and its policy is a compile error,
//! not a latent bug.
//!
//! Authority per mode: Manual — keypad codes drive actuators directly;
//! Auto — the due-flag policy (thresholds + proximity dwell window);
//! Cycle — the due-flag square wave; Remote — mirrored command frames.
//! Leaving any of the three automatic modes forces fan, lamp, buzzer off
//! and the motor stopped so a stale policy can never leave something
//! running.

pub mod context;
pub mod policy;

use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

use log::info;

use context::ControlContext;
use policy::PolicyLatches;

use crate::tick::TickScheduler;

// ---------------------------------------------------------------------------
// Operating mode
// ---------------------------------------------------------------------------

/// The four top-level operating modes.
///
/// Fits one machine word with no invalid intermediate states, which is
/// what lets the tick interrupt read the published mode while the main
/// loop owns transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OperatingMode {
    Manual = 0,
    Auto = 1,
    Cycle = 2,
    Remote = 3,
}

/// Mode cell shared with the tick interrupt. Written by the main loop on
/// transition, read every tick.
static PUBLISHED_MODE: AtomicU8 = AtomicU8::new(OperatingMode::Manual as u8);

impl OperatingMode {
    /// Total number of modes.
    pub const COUNT: usize = 4;

    /// The forward-only rotation.
    pub const fn next(self) -> Self {
        match self {
            Self::Manual => Self::Auto,
            Self::Auto => Self::Cycle,
            Self::Cycle => Self::Remote,
            Self::Remote => Self::Manual,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Manual => "MANUAL",
            Self::Auto => "AUTO",
            Self::Cycle => "CYCLE",
            Self::Remote => "REMOTE",
        }
    }

    /// Publish this mode for the tick interrupt.
    pub fn publish(self) {
        PUBLISHED_MODE.store(self as u8, Ordering::Release);
    }

    /// The mode last published; what the tick interrupt acts on.
    pub fn published() -> Self {
        Self::from_u8(PUBLISHED_MODE.load(Ordering::Acquire))
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Manual,
            1 => Self::Auto,
            2 => Self::Cycle,
            3 => Self::Remote,
            _ => {
                debug_assert!(false, "invalid mode byte: {raw}");
                Self::Manual
            }
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

/// Owns the current mode and the per-mode policy latches.
pub struct ModeCoordinator {
    mode: OperatingMode,
    latches: PolicyLatches,
}

impl ModeCoordinator {
    /// Starts in Manual with direct keypad authority.
    pub fn new() -> Self {
        Self {
            mode: OperatingMode::Manual,
            latches: PolicyLatches::default(),
        }
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// Advance one step in the rotation, running exit and entry actions.
    ///
    /// Returns `(from, to)` so the caller can report the transition. The
    /// caller (the service) publishes the new mode for the tick
    /// interrupt; zeroing of the mode-scoped timers then happens on the
    /// next tick.
    pub fn advance(
        &mut self,
        ctx: &mut ControlContext,
        tick: &TickScheduler,
    ) -> (OperatingMode, OperatingMode) {
        let from = self.mode;
        let to = from.next();

        // Exit actions, one arm per mode.
        match from {
            OperatingMode::Manual => {}
            OperatingMode::Auto => {
                ctx.commands.neutralize();
                tick.clear_dwell();
            }
            OperatingMode::Cycle => {
                ctx.commands.neutralize();
                self.latches.cycle_outputs_on = None;
            }
            OperatingMode::Remote => {
                ctx.commands.neutralize();
            }
        }

        // Entry actions.
        match to {
            OperatingMode::Manual | OperatingMode::Cycle | OperatingMode::Remote => {}
            OperatingMode::Auto => {
                // Seed edge detection from the present level so an object
                // already sitting in the throat does not open a dwell
                // window on entry.
                self.latches.prev_proximity = ctx.snapshot.proximity;
            }
        }

        self.mode = to;
        info!("mode: {from} -> {to}");
        (from, to)
    }

    /// Run the current mode's periodic policy. Call only after
    /// [`TickScheduler::take_due`] returned true.
    pub fn run_due_policy(&mut self, ctx: &mut ControlContext, tick: &TickScheduler) {
        match self.mode {
            // Manual holds whatever dispatch last commanded; Remote holds
            // the last mirrored frame. Neither has periodic work.
            OperatingMode::Manual | OperatingMode::Remote => {}
            OperatingMode::Auto => policy::auto_policy(&mut self.latches, ctx, tick),
            OperatingMode::Cycle => policy::cycle_policy(&mut self.latches, ctx, tick),
        }
    }
}

impl Default for ModeCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SystemConfig;

    fn fixture() -> (ModeCoordinator, ControlContext, TickScheduler) {
        (
            ModeCoordinator::new(),
            ControlContext::new(SystemConfig::default()),
            TickScheduler::new(),
        )
    }

    #[test]
    fn rotation_is_total_and_forward_only() {
        let (mut coord, mut ctx, tick) = fixture();
        assert_eq!(coord.mode(), OperatingMode::Manual);

        let expected = [
            OperatingMode::Auto,
            OperatingMode::Cycle,
            OperatingMode::Remote,
            OperatingMode::Manual,
        ];
        for want in expected {
            let (_, to) = coord.advance(&mut ctx, &tick);
            assert_eq!(to, want);
            assert_eq!(coord.mode(), want);
        }
    }

    #[test]
    fn next_covers_every_mode_in_one_cycle() {
        let mut seen = [false; OperatingMode::COUNT];
        let mut mode = OperatingMode::Manual;
        for _ in 0..OperatingMode::COUNT {
            seen[mode as usize] = true;
            mode = mode.next();
        }
        assert_eq!(mode, OperatingMode::Manual);
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn leaving_auto_neutralizes_and_clears_dwell() {
        let (mut coord, mut ctx, tick) = fixture();
        coord.advance(&mut ctx, &tick); // -> Auto

        ctx.commands.fan = true;
        ctx.commands.lamp = true;
        ctx.commands.motor_speed = 20;
        ctx.commands.servo_angle = 90;
        tick.latch_dwell();

        coord.advance(&mut ctx, &tick); // -> Cycle
        assert!(!ctx.commands.fan);
        assert!(!ctx.commands.lamp);
        assert!(!ctx.commands.buzzer);
        assert_eq!(ctx.commands.motor_speed, 0);
        assert_eq!(ctx.commands.servo_angle, 90, "servo must not be re-homed");
        assert!(!tick.dwell_active());
    }

    #[test]
    fn leaving_remote_neutralizes() {
        let (mut coord, mut ctx, tick) = fixture();
        for _ in 0..3 {
            coord.advance(&mut ctx, &tick);
        }
        assert_eq!(coord.mode(), OperatingMode::Remote);

        ctx.commands.fan = true;
        ctx.commands.buzzer = true;
        ctx.commands.motor_speed = 50;

        coord.advance(&mut ctx, &tick); // -> Manual
        assert!(!ctx.commands.fan);
        assert!(!ctx.commands.buzzer);
        assert_eq!(ctx.commands.motor_speed, 0);
    }

    #[test]
    fn leaving_manual_keeps_commands() {
        let (mut coord, mut ctx, tick) = fixture();
        ctx.commands.servo_angle = 45;
        ctx.commands.fan = true;

        coord.advance(&mut ctx, &tick); // Manual -> Auto
        // Manual has no per-mode policy to go stale, so nothing is forced
        // off; the first Auto due evaluation takes over from here.
        assert!(ctx.commands.fan);
        assert_eq!(ctx.commands.servo_angle, 45);
    }

    #[test]
    fn entering_auto_seeds_proximity_edge_detector() {
        let (mut coord, mut ctx, tick) = fixture();
        ctx.snapshot.proximity = true;
        coord.advance(&mut ctx, &tick); // -> Auto

        // Held-high proximity at entry is not an edge: the first policy
        // pass must not open a dwell window.
        coord.run_due_policy(&mut ctx, &tick);
        assert!(!tick.dwell_active());
        assert!(!ctx.commands.lamp);
    }

    #[test]
    fn publish_roundtrip() {
        // The only test that touches the process-wide mode cell; keeping
        // it alone avoids cross-test interleaving on the static.
        OperatingMode::Cycle.publish();
        assert_eq!(OperatingMode::published(), OperatingMode::Cycle);
        OperatingMode::Manual.publish();
        assert_eq!(OperatingMode::published(), OperatingMode::Manual);
    }
}
