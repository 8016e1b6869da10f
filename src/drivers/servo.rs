//! Door servo driver (standard 50 Hz hobby servo).
//!
//! Angle maps linearly onto a 0.5 – 2.5 ms pulse inside the 20 ms
//! frame. At 14-bit resolution one duty step is ~1.2 µs, comfortably
//! below the servo's own deadband.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real LEDC channel via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

/// Pulse width at 0 degrees.
const PULSE_MIN_US: u32 = 500;
/// Pulse width at 180 degrees.
const PULSE_MAX_US: u32 = 2_500;
/// 50 Hz frame length.
const FRAME_US: u32 = 20_000;

pub struct ServoDriver {
    angle: u16,
}

impl Default for ServoDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ServoDriver {
    pub fn new() -> Self {
        Self { angle: 0 }
    }

    /// Command an angle; values above 180 are clamped.
    pub fn set_angle(&mut self, degrees: u16) {
        let degrees = degrees.min(180);
        hw_init::ledc_set(hw_init::LEDC_CH_SERVO, duty_for(degrees));
        self.angle = degrees;
    }

    pub fn current_angle(&self) -> u16 {
        self.angle
    }
}

/// Angle to 14-bit LEDC duty.
fn duty_for(degrees: u16) -> u32 {
    let span = PULSE_MAX_US - PULSE_MIN_US;
    let pulse_us = PULSE_MIN_US + u32::from(degrees) * span / 180;
    pulse_us * (1 << pins::SERVO_PWM_RESOLUTION_BITS) / FRAME_US
}
