//! Integration tests for the serial link: inbound frame handling across
//! modes, reject/drop surfacing and the outbound telemetry cadence.

use crate::mock_hw::{ActuatorCall, MockDisplay, MockHardware, RecordingSink};

use stericab::app::events::AppEvent;
use stericab::app::ports::LinkStatus;
use stericab::app::service::AppService;
use stericab::config::SystemConfig;
use stericab::error::FrameError;
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

/// Advance the rotation until the service sits in `target`.
fn enter_mode(
    target: OperatingMode,
    app: &mut AppService,
    hw: &mut MockHardware,
    display: &mut MockDisplay,
    sink: &mut RecordingSink,
    tick: &TickScheduler,
) {
    while app.mode() != target {
        hw.press(16);
        app.run_pass(hw, display, sink, tick);
    }
}

// ── Inbound frames ────────────────────────────────────────────

#[test]
fn remote_frame_mirrors_onto_the_actuators() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();
    enter_mode(OperatingMode::Remote, &mut app, &mut hw, &mut display, &mut sink, &tick);

    // uv | servo | fan | motor
    hw.receive_flags(0b0000_1111);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert!(hw.lamp_on());
    assert!(hw.fan_on());
    assert_eq!(hw.servo_angle(), 90);
    assert_eq!(hw.motor_speed(), 50);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::FrameReceived(_))), 1);

    hw.receive_flags(0);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert!(!hw.lamp_on());
    assert!(!hw.fan_on());
    assert_eq!(hw.servo_angle(), 0);
    assert_eq!(hw.motor_speed(), 0);
}

#[test]
fn mirroring_is_ignored_outside_remote() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();
    assert_eq!(app.mode(), OperatingMode::Manual);

    hw.receive_flags(0b0000_0101); // uv | fan
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);

    assert!(!hw.calls.contains(&ActuatorCall::Lamp(true)));
    assert!(!hw.calls.contains(&ActuatorCall::Fan(true)));
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::FrameReceived(_))),
        1,
        "the frame is still surfaced even though the flags are ignored"
    );
}

#[test]
fn toggle_bit_advances_the_mode() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();

    hw.receive_flags(0b0001_0000);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);

    assert_eq!(app.mode(), OperatingMode::Auto);
    assert_eq!(
        sink.count(|e| matches!(
            e,
            AppEvent::ModeChanged {
                from: OperatingMode::Manual,
                to: OperatingMode::Auto,
            }
        )),
        1
    );
}

#[test]
fn every_queued_toggle_advances_once() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();

    hw.receive_flags(0b0001_0000);
    hw.receive_flags(0b0001_0000);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);

    assert_eq!(app.mode(), OperatingMode::Cycle, "two toggles, two steps");
    assert_eq!(sink.count(|e| matches!(e, AppEvent::ModeChanged { .. })), 2);
}

#[test]
fn mirror_lands_before_a_toggle_leaves_remote() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();
    enter_mode(OperatingMode::Remote, &mut app, &mut hw, &mut display, &mut sink, &tick);

    // fan | toggle: the mirror applies in Remote, then the rotation
    // exit sweep neutralizes it before anything reaches the hardware.
    hw.receive_flags(0b0001_0100);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);

    assert_eq!(app.mode(), OperatingMode::Manual);
    assert!(!hw.fan_on());
    assert!(
        !hw.calls.contains(&ActuatorCall::Fan(true)),
        "the mirrored fan state must never be written out"
    );
}

// ── Reject and drop surfacing ─────────────────────────────────

#[test]
fn reject_counters_surface_as_status_and_events() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();
    assert_eq!(app.link_status(), LinkStatus::Idle);

    hw.checksum_rejects = 3;
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert_eq!(app.link_status(), LinkStatus::ChecksumError);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::FrameRejected(FrameError::Checksum))),
        1,
        "a burst of rejects collapses into one event"
    );

    // Nothing new: no repeat event.
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::FrameRejected(FrameError::Checksum))),
        1
    );

    hw.framing_rejects = 1;
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert_eq!(app.link_status(), LinkStatus::FramingError);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::FrameRejected(FrameError::Framing))),
        1
    );

    // A good frame clears the sticky error status.
    hw.receive_flags(0);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert_eq!(app.link_status(), LinkStatus::FrameOk);
}

#[test]
fn queue_drops_warn_without_changing_status() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();

    hw.dropped = 2;
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);

    assert_eq!(app.link_status(), LinkStatus::Idle);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::FrameRejected(_))), 0);
}

// ── Outbound telemetry ────────────────────────────────────────

#[test]
fn telemetry_waits_for_the_interval() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();

    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert!(hw.tx.is_empty(), "nothing is sent before the interval");

    run_ticks(&tick, OperatingMode::Manual, 499);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert!(hw.tx.is_empty());

    run_ticks(&tick, OperatingMode::Manual, 1);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert_eq!(hw.tx.len(), 10);
}

#[test]
fn telemetry_bytes_match_the_wire_format() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();

    hw.set_climate(24, 7, 55, 2);
    hw.uv_level = 3;
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);

    run_ticks(&tick, OperatingMode::Manual, 500);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert_eq!(
        hw.tx,
        vec![0xA5, 0, 0, 3, 55, 2, 24, 7, 91, 0x5A],
        "sequence 0, 24.7 C / 55.2 %RH, level 3"
    );

    run_ticks(&tick, OperatingMode::Manual, 500);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);
    assert_eq!(hw.tx[10..], [0xA5, 0, 1, 3, 55, 2, 24, 7, 92, 0x5A]);

    let sequences: Vec<u16> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::TelemetrySent(report) => Some(report.sequence),
            _ => None,
        })
        .collect();
    assert_eq!(sequences, vec![0, 1]);
}

#[test]
fn telemetry_carries_frozen_values_while_stale() {
    let (mut app, mut hw, mut display, mut sink, tick) = fixture();

    hw.set_climate(24, 7, 55, 2);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);

    hw.fail_climate();
    run_ticks(&tick, OperatingMode::Manual, 500);
    app.run_pass(&mut hw, &mut display, &mut sink, &tick);

    assert_eq!(
        hw.tx[4..8],
        [55, 2, 24, 7],
        "the frozen reading goes on the wire"
    );
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::TelemetrySent(report) if report.stale
    )));
}
