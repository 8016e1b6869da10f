//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the mode coordinator, the shared control context
//! and the link bookkeeping.  It exposes a clean, hardware-agnostic API.
//! All I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌─────────────────────────┐ ──▶ EventSink
//!  KeypadPort ──▶ │       AppService        │ ──▶ DisplayPort
//!    LinkPort ◀─▶ │  dispatch · mode · tick │
//! ActuatorPort ◀──└─────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::SystemConfig;
use crate::dispatch::{self, Action, DeviceAction, SensorSource};
use crate::error::FrameError;
use crate::link::{CommandFrame, TelemetryFrame};
use crate::mode::context::{ActuatorCommands, ClimateReading, ControlContext};
use crate::mode::{ModeCoordinator, OperatingMode};
use crate::tick::TickScheduler;

use super::events::{AppEvent, TelemetryReport};
use super::ports::{
    ActuatorPort, DisplayPort, DisplayView, EventSink, KeypadPort, LinkPort, LinkStatus,
    SensorPort,
};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    coordinator: ModeCoordinator,
    ctx: ControlContext,
    /// Where snapshot climate values come from (live probe or canned).
    source: SensorSource,
    /// Last successful probe reading, held through probe dropouts.
    last_good_climate: ClimateReading,
    climate_stale: bool,
    /// Last keypad code seen, for the status surface.
    last_key: u8,
    link_status: LinkStatus,
    /// (checksum, framing) reject totals already surfaced.
    seen_rejects: (u32, u32),
    /// Queue-drop total already surfaced.
    seen_dropped: u32,
    /// Telemetry sequence number; wraps at u16::MAX.
    sequence: u16,
    last_telemetry_ms: u32,
    /// What the actuator port last received; `None` until the first
    /// pass so the hardware gets homed to the defaults.
    applied: Option<ActuatorCommands>,
    pass_count: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** announce the initial mode — call [`start`] next.
    ///
    /// [`start`]: AppService::start
    pub fn new(config: SystemConfig) -> Self {
        Self {
            coordinator: ModeCoordinator::new(),
            ctx: ControlContext::new(config),
            source: SensorSource::Live,
            last_good_climate: ClimateReading::default(),
            climate_stale: false,
            last_key: 0,
            link_status: LinkStatus::Idle,
            seen_rejects: (0, 0),
            seen_dropped: 0,
            sequence: 0,
            last_telemetry_ms: 0,
            applied: None,
            pass_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Publish the boot mode and announce startup.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        let mode = self.coordinator.mode();
        mode.publish();
        sink.emit(&AppEvent::Started(mode));
        info!("AppService started in {mode} mode");
    }

    // ── Per-pass orchestration ────────────────────────────────

    /// Run one full main-loop pass: inputs → snapshot → policy →
    /// actuators → telemetry → display.
    ///
    /// The `hw` parameter satisfies all four hardware-facing ports —
    /// this avoids a double mutable borrow while keeping the port
    /// boundary explicit.
    pub fn run_pass(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort + KeypadPort + LinkPort),
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
        tick: &TickScheduler,
    ) {
        self.pass_count += 1;

        // 1. Poll the keypad and dispatch any press
        let key = hw.poll_key();
        if key != 0 {
            self.last_key = key;
            sink.emit(&AppEvent::KeyPressed(key));
            if let Some(action) = dispatch::on_key(key, self.coordinator.mode()) {
                self.apply_action(action, tick, sink);
            }
        }

        // 2. Drain the radio link (frames first surfaced in the
        //    receive context)
        self.drain_link(hw, tick, sink);

        // 3. Rebuild the sensor snapshot
        self.refresh_snapshot(hw, sink);

        // 4. Run the active mode's policy when the scheduler says so
        if tick.take_due() {
            self.coordinator.run_due_policy(&mut self.ctx, tick);
        }

        // 5. Apply actuator commands (diffed against last applied)
        self.apply_actuators(hw);

        // 6. Telemetry on its own cadence
        self.maybe_send_telemetry(hw, tick, sink);

        // 7. Refresh the status surface
        display.render(&DisplayView {
            snapshot: self.ctx.snapshot,
            mode: self.coordinator.mode(),
            last_key: self.last_key,
            link: self.link_status,
            uptime_secs: tick.seconds(),
        });
    }

    // ── Input handling ────────────────────────────────────────

    /// Apply one dispatched keypad action.
    fn apply_action(&mut self, action: Action, tick: &TickScheduler, sink: &mut impl EventSink) {
        match action {
            Action::Device(device) => self.apply_device(device),
            Action::SelectSource(source) => {
                if source != self.source {
                    info!("sensor source -> {source:?}");
                }
                self.source = source;
            }
            Action::AdvanceMode => self.advance_mode(tick, sink),
        }
    }

    fn apply_device(&mut self, action: DeviceAction) {
        let cmds = &mut self.ctx.commands;
        match action {
            DeviceAction::Buzzer(on) => cmds.buzzer = on,
            DeviceAction::Fan(on) => cmds.fan = on,
            DeviceAction::Lamp(on) => cmds.lamp = on,
            DeviceAction::MotorServo { speed, angle } => {
                cmds.motor_speed = speed;
                cmds.servo_angle = angle;
            }
        }
    }

    /// Rotate to the next mode and publish it for the tick context.
    fn advance_mode(&mut self, tick: &TickScheduler, sink: &mut impl EventSink) {
        let (from, to) = self.coordinator.advance(&mut self.ctx, tick);
        to.publish();
        sink.emit(&AppEvent::ModeChanged { from, to });
    }

    /// Drain pending inbound frames and surface reject bookkeeping.
    fn drain_link(
        &mut self,
        link: &mut impl LinkPort,
        tick: &TickScheduler,
        sink: &mut impl EventSink,
    ) {
        // Rejects recorded in the receive context since the last pass.
        let (checksum, framing) = link.reject_counts();
        if framing > self.seen_rejects.1 {
            self.link_status = LinkStatus::FramingError;
            warn!("link: {} framing reject(s)", framing - self.seen_rejects.1);
            sink.emit(&AppEvent::FrameRejected(FrameError::Framing));
        }
        if checksum > self.seen_rejects.0 {
            self.link_status = LinkStatus::ChecksumError;
            warn!("link: {} checksum reject(s)", checksum - self.seen_rejects.0);
            sink.emit(&AppEvent::FrameRejected(FrameError::Checksum));
        }
        self.seen_rejects = (checksum, framing);

        let dropped = link.dropped_count();
        if dropped > self.seen_dropped {
            warn!(
                "link: {} frame(s) dropped on a full queue",
                dropped - self.seen_dropped
            );
            self.seen_dropped = dropped;
        }

        while let Some(frame) = link.take_frame() {
            self.link_status = LinkStatus::FrameOk;
            sink.emit(&AppEvent::FrameReceived(frame));

            let actions = dispatch::on_frame(frame, self.coordinator.mode());
            // Mirror before any mode advance, matching the remote's
            // expectation that the flags land in the mode that received
            // them.
            if let Some(mirror) = actions.mirror {
                self.apply_mirror(mirror);
            }
            if actions.advance_mode {
                self.advance_mode(tick, sink);
            }
        }
    }

    /// Mirror a Remote-mode frame's flags onto the actuator commands.
    fn apply_mirror(&mut self, frame: CommandFrame) {
        let config = &self.ctx.config;
        let cmds = &mut self.ctx.commands;
        cmds.lamp = frame.uv;
        cmds.fan = frame.fan;
        cmds.servo_angle = if frame.servo {
            config.servo_open_angle
        } else {
            config.servo_closed_angle
        };
        cmds.motor_speed = if frame.motor {
            config.remote_motor_speed
        } else {
            0
        };
    }

    // ── Snapshot ──────────────────────────────────────────────

    /// Rebuild the sensor snapshot for this pass.
    ///
    /// A probe failure freezes the last good reading and flags it stale;
    /// a canned source skips the probe entirely without disturbing the
    /// stale tracking.
    fn refresh_snapshot(&mut self, hw: &mut impl SensorPort, sink: &mut impl EventSink) {
        let climate = match self.source.canned_climate() {
            Some(canned) => canned,
            None => match hw.read_climate() {
                Ok(reading) => {
                    if self.climate_stale {
                        self.climate_stale = false;
                        info!("climate probe recovered");
                        sink.emit(&AppEvent::SensorRecovered);
                    }
                    self.last_good_climate = reading;
                    reading
                }
                Err(err) => {
                    if !self.climate_stale {
                        self.climate_stale = true;
                        warn!("climate read failed ({err}); holding last good reading");
                        sink.emit(&AppEvent::SensorStale);
                    }
                    self.last_good_climate
                }
            },
        };

        self.ctx.snapshot.climate = climate;
        self.ctx.snapshot.climate_stale =
            self.source == SensorSource::Live && self.climate_stale;
        self.ctx.snapshot.uv_level = hw.read_uv_level().min(11);
        self.ctx.snapshot.proximity = hw.read_proximity();
    }

    // ── Outputs ───────────────────────────────────────────────

    /// Translate actuator commands into port calls, skipping values the
    /// hardware already has. The first pass writes everything so the
    /// outputs start from a known state.
    fn apply_actuators(&mut self, hw: &mut impl ActuatorPort) {
        let want = self.ctx.commands;
        let have = self.applied;

        if have.is_none_or(|h| h.fan != want.fan) {
            hw.set_fan(want.fan);
        }
        if have.is_none_or(|h| h.lamp != want.lamp) {
            hw.set_lamp(want.lamp);
        }
        if have.is_none_or(|h| h.buzzer != want.buzzer) {
            hw.set_buzzer(want.buzzer);
        }
        if have.is_none_or(|h| h.motor_speed != want.motor_speed) {
            hw.set_motor_speed(want.motor_speed);
        }
        if have.is_none_or(|h| h.servo_angle != want.servo_angle) {
            hw.set_servo_angle(want.servo_angle);
        }

        self.applied = Some(want);
    }

    /// Send a telemetry frame when the interval has elapsed.
    fn maybe_send_telemetry(
        &mut self,
        link: &mut impl LinkPort,
        tick: &TickScheduler,
        sink: &mut impl EventSink,
    ) {
        let now = tick.millis();
        if now.wrapping_sub(self.last_telemetry_ms) < self.ctx.config.telemetry_interval_ms {
            return;
        }
        self.last_telemetry_ms = now;

        let snap = &self.ctx.snapshot;
        let frame = TelemetryFrame {
            sequence: self.sequence,
            uv_level: snap.uv_level,
            humidity_int: snap.climate.humidity_int,
            humidity_frac: snap.climate.humidity_frac,
            temperature_int: snap.climate.temperature_int,
            temperature_frac: snap.climate.temperature_frac,
        };
        link.send_frame(&frame.encode());

        sink.emit(&AppEvent::TelemetrySent(TelemetryReport {
            sequence: self.sequence,
            mode: self.coordinator.mode(),
            uv_level: snap.uv_level,
            temperature_c: snap.climate.temperature_c(),
            humidity_rh: snap.climate.humidity_rh(),
            stale: snap.climate_stale,
        }));
        self.sequence = self.sequence.wrapping_add(1);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current operating mode.
    pub fn mode(&self) -> OperatingMode {
        self.coordinator.mode()
    }

    /// Last inbound link outcome.
    pub fn link_status(&self) -> LinkStatus {
        self.link_status
    }

    /// Main-loop passes executed since startup.
    pub fn pass_count(&self) -> u64 {
        self.pass_count
    }

    /// Clone of the live configuration.
    pub fn current_config(&self) -> SystemConfig {
        self.ctx.config.clone()
    }
}
