//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`], every actuator driver, the keypad scanner
//! and the link plumbing, exposing them through the four hardware-facing
//! ports.  This is the only module in the system that touches actual
//! hardware.  On non-espidf targets, the underlying drivers use
//! cfg-gated simulation stubs.

use crate::app::ports::{ActuatorPort, KeypadPort, LinkPort, SensorPort};
use crate::drivers::buzzer::BuzzerDriver;
use crate::drivers::fan::FanDriver;
use crate::drivers::keypad::KeypadScanner;
use crate::drivers::lamp::LampDriver;
use crate::drivers::motor::MotorDriver;
use crate::drivers::servo::ServoDriver;
use crate::drivers::uart;
use crate::error::SensorError;
use crate::events;
use crate::link::CommandFrame;
use crate::mode::context::ClimateReading;
use crate::sensors::SensorHub;
use crate::tick::TICK;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensor_hub: SensorHub,
    fan: FanDriver,
    lamp: LampDriver,
    buzzer: BuzzerDriver,
    motor: MotorDriver,
    servo: ServoDriver,
    keypad: KeypadScanner,
}

impl HardwareAdapter {
    pub fn new(
        sensor_hub: SensorHub,
        fan: FanDriver,
        lamp: LampDriver,
        buzzer: BuzzerDriver,
        motor: MotorDriver,
        servo: ServoDriver,
        keypad: KeypadScanner,
    ) -> Self {
        Self {
            sensor_hub,
            fan,
            lamp,
            buzzer,
            motor,
            servo,
            keypad,
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_climate(&mut self) -> Result<ClimateReading, SensorError> {
        self.sensor_hub.read_climate()
    }

    fn read_uv_level(&mut self) -> u8 {
        self.sensor_hub.read_uv_level()
    }

    fn read_proximity(&mut self) -> bool {
        self.sensor_hub.read_proximity()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_fan(&mut self, on: bool) {
        self.fan.set(on);
    }

    fn set_lamp(&mut self, on: bool) {
        self.lamp.set(on);
    }

    fn set_buzzer(&mut self, on: bool) {
        self.buzzer.set(on);
    }

    fn set_motor_speed(&mut self, speed: i16) {
        self.motor.set_speed(speed);
    }

    fn set_servo_angle(&mut self, degrees: u16) {
        self.servo.set_angle(degrees);
    }
}

// ── KeypadPort implementation ─────────────────────────────────

impl KeypadPort for HardwareAdapter {
    fn poll_key(&mut self) -> u8 {
        self.keypad.poll(TICK.millis())
    }
}

// ── LinkPort implementation ───────────────────────────────────
//
// Inbound traffic was decoded in the receive task; this side only
// drains the hand-off queue and counters.

impl LinkPort for HardwareAdapter {
    fn take_frame(&mut self) -> Option<CommandFrame> {
        events::take_frame()
    }

    fn reject_counts(&self) -> (u32, u32) {
        events::frame_error_counts()
    }

    fn dropped_count(&self) -> u32 {
        events::dropped_frame_count()
    }

    fn write_byte(&mut self, byte: u8) {
        uart::write_byte(byte);
    }
}
