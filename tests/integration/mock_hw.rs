//! Mock hardware adapter for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO/PWM registers. Inputs (keys,
//! climate, frames, reject counters) are scripted by the tests between
//! passes.

use std::collections::VecDeque;

use stericab::app::events::AppEvent;
use stericab::app::ports::{
    ActuatorPort, DisplayPort, DisplayView, EventSink, KeypadPort, LinkPort, SensorPort,
};
use stericab::error::SensorError;
use stericab::link::CommandFrame;
use stericab::mode::context::ClimateReading;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Fan(bool),
    Lamp(bool),
    Buzzer(bool),
    MotorSpeed(i16),
    ServoAngle(u16),
}

// ── MockHardware ──────────────────────────────────────────────

/// Implements all four hardware-facing ports over scripted state.
pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    /// Pending key codes, one consumed per pass.
    pub keys: VecDeque<u8>,
    /// What the next climate read returns.
    pub climate: Result<ClimateReading, SensorError>,
    pub uv_level: u8,
    pub proximity: bool,
    /// Pending inbound frames, drained fully each pass.
    pub frames: VecDeque<CommandFrame>,
    pub checksum_rejects: u32,
    pub framing_rejects: u32,
    pub dropped: u32,
    /// Everything sent out on the link.
    pub tx: Vec<u8>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            keys: VecDeque::new(),
            climate: Ok(ClimateReading::default()),
            uv_level: 0,
            proximity: false,
            frames: VecDeque::new(),
            checksum_rejects: 0,
            framing_rejects: 0,
            dropped: 0,
            tx: Vec::new(),
        }
    }

    /// Queue a key press for the next pass.
    pub fn press(&mut self, code: u8) {
        self.keys.push_back(code);
    }

    /// Script the next climate reads (integer + tenths, probe order).
    pub fn set_climate(&mut self, t_int: u8, t_frac: u8, h_int: u8, h_frac: u8) {
        self.climate = Ok(ClimateReading::new(t_int, t_frac, h_int, h_frac));
    }

    /// Make the probe fail until `set_climate` is called again.
    pub fn fail_climate(&mut self) {
        self.climate = Err(SensorError::Timeout);
    }

    /// Queue an inbound frame from its flags byte.
    pub fn receive_flags(&mut self, flags: u8) {
        self.frames.push_back(CommandFrame::from_flags(flags));
    }

    // Latest-commanded state, scanned from the call history.

    pub fn fan_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Fan(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn lamp_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Lamp(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn buzzer_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Buzzer(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn motor_speed(&self) -> i16 {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::MotorSpeed(v) => Some(*v),
                _ => None,
            })
            .unwrap_or(0)
    }

    pub fn servo_angle(&self) -> u16 {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::ServoAngle(v) => Some(*v),
                _ => None,
            })
            .unwrap_or(0)
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_climate(&mut self) -> Result<ClimateReading, SensorError> {
        self.climate
    }

    fn read_uv_level(&mut self) -> u8 {
        self.uv_level
    }

    fn read_proximity(&mut self) -> bool {
        self.proximity
    }
}

impl ActuatorPort for MockHardware {
    fn set_fan(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Fan(on));
    }

    fn set_lamp(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Lamp(on));
    }

    fn set_buzzer(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Buzzer(on));
    }

    fn set_motor_speed(&mut self, speed: i16) {
        self.calls.push(ActuatorCall::MotorSpeed(speed));
    }

    fn set_servo_angle(&mut self, degrees: u16) {
        self.calls.push(ActuatorCall::ServoAngle(degrees));
    }
}

impl KeypadPort for MockHardware {
    fn poll_key(&mut self) -> u8 {
        self.keys.pop_front().unwrap_or(0)
    }
}

impl LinkPort for MockHardware {
    fn take_frame(&mut self) -> Option<CommandFrame> {
        self.frames.pop_front()
    }

    fn reject_counts(&self) -> (u32, u32) {
        (self.checksum_rejects, self.framing_rejects)
    }

    fn dropped_count(&self) -> u32 {
        self.dropped
    }

    fn write_byte(&mut self, byte: u8) {
        self.tx.push(byte);
    }
}

// ── MockDisplay ───────────────────────────────────────────────

/// Captures every rendered view, change-suppression left to real
/// adapters.
pub struct MockDisplay {
    pub views: Vec<DisplayView>,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn new() -> Self {
        Self { views: Vec::new() }
    }

    pub fn last(&self) -> &DisplayView {
        self.views.last().expect("nothing rendered yet")
    }
}

impl Default for MockDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPort for MockDisplay {
    fn render(&mut self, view: &DisplayView) {
        self.views.push(*view);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count<F: Fn(&AppEvent) -> bool>(&self, pred: F) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
