//! Integration tests for the keypad → service → actuator pipeline and
//! the per-mode policies, run through full `AppService::run_pass` passes
//! with scripted inputs.
//!
//! Every test drives its own local `TickScheduler`, so no process-wide
//! state is shared between tests.

use crate::mock_hw::{ActuatorCall, MockDisplay, MockHardware, RecordingSink};

use stericab::app::events::AppEvent;
use stericab::app::service::AppService;
use stericab::config::SystemConfig;
use stericab::mode::OperatingMode;
use stericab::tick::TickScheduler;

fn fixture() -> (AppService, MockHardware, MockDisplay, RecordingSink, TickScheduler) {
    let mut app = AppService::new(SystemConfig::default());
    let hw = MockHardware::new();
    let display = MockDisplay::new();
    let mut sink = RecordingSink::new();
    app.start(&mut sink);
    (app, hw, display, sink, TickScheduler::new())
}

fn run_ticks(tick: &TickScheduler, mode: OperatingMode, n: u32) {
    for _ in 0..n {
        tick.on_tick(mode);
    }
}

/// Press key 16 and run one pass, advancing the rotation one step.
fn advance(
    app: &mut AppService,
    hw: &mut MockHardware,
    display: &mut MockDisplay,
    sink: &mut RecordingSink,
    tick: &TickScheduler,
) {
    hw.press(16);
    app.run_pass(hw, display, sink, tick);
}

// ── Startup and actuator application ──────────────────────────

#[test]
fn startup_announces_manual_mode() {
    let (app, _hw, _display, sink, _tick) = fixture();
    assert_eq!(app.mode(), OperatingMode::Manual);
    assert!(matches!(
        sink.events[0],
        AppEvent::Started(OperatingMode::Manual)
    ));
}

#[test]
fn first_pass_homes_every_actuator() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert_eq!(
        hw.calls,
        vec![
            ActuatorCall::Fan(false),
            ActuatorCall::Lamp(false),
            ActuatorCall::Buzzer(false),
            ActuatorCall::MotorSpeed(0),
            ActuatorCall::ServoAngle(0),
        ]
    );
}

#[test]
fn unchanged_commands_write_nothing() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    let homed = hw.calls.len();

    for _ in 0..5 {
        app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    }
    assert_eq!(hw.calls.len(), homed, "idle passes must not touch hardware");
}

// ── Manual keypad authority ───────────────────────────────────

#[test]
fn manual_keys_drive_the_actuators() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();

    hw.press(3); // fan on
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert!(hw.fan_on());

    hw.press(1); // buzzer on
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert!(hw.buzzer_on());

    hw.press(9); // motor +20, door 90
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert_eq!(hw.motor_speed(), 20);
    assert_eq!(hw.servo_angle(), 90);

    hw.press(4); // fan off
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert!(!hw.fan_on());
    assert!(hw.buzzer_on(), "other outputs keep their state");

    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::KeyPressed(_))),
        4,
        "every accepted press is surfaced"
    );
}

#[test]
fn device_keys_are_ignored_outside_manual() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();
    advance(&mut app, &mut hw, &mut display, &mut sink, &tick);
    assert_eq!(app.mode(), OperatingMode::Auto);

    hw.calls.clear();
    hw.press(3); // fan on — Manual-only
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);

    assert!(!hw.calls.contains(&ActuatorCall::Fan(true)));
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::KeyPressed(3))),
        1,
        "the press is still surfaced even though it is ignored"
    );
}

#[test]
fn key_16_walks_the_full_rotation() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();

    for _ in 0..4 {
        advance(&mut app, &mut hw, &mut display, &mut sink, &tick);
    }
    assert_eq!(app.mode(), OperatingMode::Manual);

    let changes: Vec<(OperatingMode, OperatingMode)> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::ModeChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        changes,
        vec![
            (OperatingMode::Manual, OperatingMode::Auto),
            (OperatingMode::Auto, OperatingMode::Cycle),
            (OperatingMode::Cycle, OperatingMode::Remote),
            (OperatingMode::Remote, OperatingMode::Manual),
        ]
    );
}

// ── Auto mode end-to-end ──────────────────────────────────────

#[test]
fn auto_thresholds_drive_fan_and_lamp() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();
    advance(&mut app, &mut hw, &mut display, &mut sink, &tick);

    hw.set_climate(32, 0, 70, 0); // above both thresholds
    run_ticks(&tick, OperatingMode::Auto, 100);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert!(hw.fan_on());
    assert!(hw.lamp_on());

    hw.set_climate(32, 0, 50, 0); // hot but dry: AND fails
    run_ticks(&tick, OperatingMode::Auto, 100);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert!(!hw.fan_on());
    assert!(!hw.lamp_on());
}

#[test]
fn proximity_edge_opens_the_dwell_window() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();
    advance(&mut app, &mut hw, &mut display, &mut sink, &tick);
    hw.set_climate(25, 0, 50, 0); // below thresholds throughout

    // Seed the edge detector with a clear throat.
    run_ticks(&tick, OperatingMode::Auto, 100);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert!(!hw.lamp_on());

    hw.proximity = true;
    run_ticks(&tick, OperatingMode::Auto, 100);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert!(hw.lamp_on(), "edge forces the lamp on");
    assert_eq!(hw.servo_angle(), 90, "edge opens the door");
    assert!(!hw.fan_on(), "the window never touches the fan");
    assert!(tick.dwell_active());
}

#[test]
fn dwell_expiry_closes_the_door_and_reverts_the_lamp() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();
    advance(&mut app, &mut hw, &mut display, &mut sink, &tick);
    hw.set_climate(25, 0, 50, 0);

    run_ticks(&tick, OperatingMode::Auto, 100);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick); // seed
    hw.proximity = true;
    run_ticks(&tick, OperatingMode::Auto, 100);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick); // edge

    // Hold the object in place for the whole window.
    run_ticks(&tick, OperatingMode::Auto, 2_000);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert!(!tick.dwell_active());
    assert_eq!(hw.servo_angle(), 0, "door closes at expiry");
    assert!(!hw.lamp_on(), "lamp reverts to threshold control");
}

#[test]
fn leaving_auto_neutralizes_outputs_but_not_the_door() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();

    hw.press(9); // motor +20, door 90 while still Manual
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);

    advance(&mut app, &mut hw, &mut display, &mut sink, &tick); // -> Auto
    hw.set_climate(35, 0, 70, 0);
    run_ticks(&tick, OperatingMode::Auto, 100);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert!(hw.fan_on());
    assert!(hw.lamp_on());
    assert_eq!(hw.motor_speed(), 20);

    advance(&mut app, &mut hw, &mut display, &mut sink, &tick); // -> Cycle
    assert!(!hw.fan_on());
    assert!(!hw.lamp_on());
    assert_eq!(hw.motor_speed(), 0);
    assert_eq!(hw.servo_angle(), 90, "the door is never re-homed on exit");
}

// ── Cycle mode end-to-end ─────────────────────────────────────

#[test]
fn cycle_square_wave_switches_the_outputs() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();
    advance(&mut app, &mut hw, &mut display, &mut sink, &tick); // Auto
    advance(&mut app, &mut hw, &mut display, &mut sink, &tick); // Cycle
    assert_eq!(app.mode(), OperatingMode::Cycle);

    run_ticks(&tick, OperatingMode::Cycle, 100); // ON phase
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert!(hw.fan_on());
    assert!(hw.lamp_on());
    assert_eq!(hw.motor_speed(), 20);
    assert!(!hw.buzzer_on(), "buzzer is not part of the wave");

    run_ticks(&tick, OperatingMode::Cycle, 5_000); // into the OFF phase
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert!(!hw.fan_on());
    assert!(!hw.lamp_on());
    assert_eq!(hw.motor_speed(), 0);
}

// ── Probe staleness ───────────────────────────────────────────

#[test]
fn probe_failure_freezes_the_last_good_reading() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();

    hw.set_climate(24, 7, 55, 2);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert!(!display.last().snapshot.climate_stale);

    hw.fail_climate();
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    let view = display.last();
    assert!(view.snapshot.climate_stale);
    assert_eq!(view.snapshot.climate.temperature_int, 24, "values frozen");
    assert_eq!(view.snapshot.climate.humidity_int, 55);

    // Still failing: no repeat event.
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::SensorStale)), 1);
}

#[test]
fn probe_recovery_clears_stale_once() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();

    hw.set_climate(24, 7, 55, 2);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    hw.fail_climate();
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);

    hw.set_climate(25, 0, 56, 0);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    let view = display.last();
    assert!(!view.snapshot.climate_stale);
    assert_eq!(view.snapshot.climate.temperature_int, 25);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::SensorRecovered)), 1);

    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::SensorRecovered)), 1);
}

#[test]
fn canned_sources_bypass_the_probe() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();

    hw.fail_climate();
    hw.press(14); // canned warm
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    let view = display.last();
    assert_eq!(view.snapshot.climate.temperature_int, 35);
    assert_eq!(view.snapshot.climate.humidity_int, 70);
    assert!(
        !view.snapshot.climate_stale,
        "a canned source is never stale"
    );

    // Back to live with the probe still down: zeros plus the marker,
    // because no live read has ever succeeded.
    hw.press(13);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    let view = display.last();
    assert!(view.snapshot.climate_stale);
    assert_eq!(view.snapshot.climate.temperature_int, 0);
}

// ── Status surface ────────────────────────────────────────────

#[test]
fn view_is_rendered_every_pass() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();
    for _ in 0..3 {
        app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    }
    assert_eq!(display.views.len(), 3);
}

#[test]
fn uv_level_is_clamped_for_the_view() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();
    hw.uv_level = 200;
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert_eq!(display.last().snapshot.uv_level, 11);
}

#[test]
fn view_carries_mode_key_and_uptime() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();

    run_ticks(&tick, OperatingMode::Manual, 3_000);
    hw.press(5);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);

    let view = display.last();
    assert_eq!(view.mode, OperatingMode::Manual);
    assert_eq!(view.last_key, 5);
    assert_eq!(view.uptime_secs, 3);
}
