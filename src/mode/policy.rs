//! Per-mode periodic policies.
//!
//! Both run in the main loop, only when the due flag fired, and only
//! touch the context blackboard. Actuator effects happen later when the
//! service applies the commands.

use super::context::ControlContext;
use crate::tick::{TickScheduler, CYCLE_ON_MS, DWELL_WINDOW_MS};

/// Mutable policy state that survives between due evaluations.
///
/// Reset points: the proximity level is re-seeded on Auto entry and the
/// cycle phase bit is cleared on Cycle exit, both by the coordinator.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyLatches {
    /// Proximity level at the previous Auto evaluation (edge detection).
    pub prev_proximity: bool,
    /// Cycle phase last written to the commands; `None` forces the first
    /// evaluation after entry to write.
    pub cycle_outputs_on: Option<bool>,
}

/// Auto mode: proximity-triggered dwell window, else climate thresholds.
///
/// A rising proximity edge opens (or re-opens) the forced window: lamp
/// on, door open, thresholds suspended. While the window runs, commands
/// are left alone. At expiry the door closes and control falls through
/// to the threshold comparison in the same pass, so the lamp reverts
/// without waiting another cadence period.
///
/// Thresholds: fan and lamp engage only when temperature and humidity
/// are both strictly above their limits. The fan is never part of the
/// dwell window.
pub fn auto_policy(latches: &mut PolicyLatches, ctx: &mut ControlContext, tick: &TickScheduler) {
    let proximity = ctx.snapshot.proximity;
    let edge = proximity && !latches.prev_proximity;
    latches.prev_proximity = proximity;

    if edge {
        tick.latch_dwell();
        ctx.commands.lamp = true;
        ctx.commands.servo_angle = ctx.config.servo_open_angle;
        return;
    }

    if tick.dwell_active() {
        if tick.dwell_millis() < DWELL_WINDOW_MS {
            return; // window holds; thresholds stay suspended
        }
        tick.clear_dwell();
        ctx.commands.servo_angle = ctx.config.servo_closed_angle;
        // Fall through: the lamp reverts to threshold control this pass.
    }

    let hot = ctx.snapshot.climate.temperature_c() > ctx.config.temperature_threshold_c;
    let humid = ctx.snapshot.climate.humidity_rh() > ctx.config.humidity_threshold_rh;
    let engage = hot && humid;
    ctx.commands.fan = engage;
    ctx.commands.lamp = engage;
}

/// Cycle mode: sensor-independent square wave, ON for the first
/// [`CYCLE_ON_MS`] of each period.
///
/// The phase bit latch keeps this from rewriting identical commands on
/// every due evaluation; only the two edges per period produce writes.
pub fn cycle_policy(latches: &mut PolicyLatches, ctx: &mut ControlContext, tick: &TickScheduler) {
    let outputs_on = tick.cycle_phase_millis() < CYCLE_ON_MS;
    if latches.cycle_outputs_on == Some(outputs_on) {
        return; // same phase; nothing to rewrite
    }
    latches.cycle_outputs_on = Some(outputs_on);

    ctx.commands.fan = outputs_on;
    ctx.commands.lamp = outputs_on;
    ctx.commands.motor_speed = if outputs_on {
        ctx.config.cycle_motor_speed
    } else {
        0
    };
}
