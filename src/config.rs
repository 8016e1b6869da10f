//! System configuration parameters
//!
//! All tunable parameters for the SteriCab control core. The timing
//! constants the tick interrupt depends on are not here; those live as
//! `const`s in [`crate::tick`] because the interrupt reads them from a
//! static scheduler. Nothing in this struct is persisted (the cabinet has
//! no non-volatile store); `Default` is the shipped behavior.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Auto-mode thresholds ---
    /// Enclosure temperature above which the climate policy engages (Celsius)
    pub temperature_threshold_c: f32,
    /// Relative humidity above which the climate policy engages (%RH)
    pub humidity_threshold_rh: f32,

    // --- Motor presets ---
    /// Motor speed commanded by the remote motor flag (-100..=100)
    pub remote_motor_speed: i16,
    /// Motor speed during the ON phase of Cycle mode (-100..=100)
    pub cycle_motor_speed: i16,

    // --- Door servo ---
    /// Servo angle for the open door position (degrees)
    pub servo_open_angle: u16,
    /// Servo angle for the closed door position (degrees)
    pub servo_closed_angle: u16,

    // --- Link ---
    /// Telemetry frame emission interval (milliseconds)
    pub telemetry_interval_ms: u32,

    // --- UV sensing ---
    /// ADC samples averaged per UV level reading
    pub uv_sample_count: u16,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Auto-mode thresholds
            temperature_threshold_c: 31.0,
            humidity_threshold_rh: 61.0,

            // Motor presets
            remote_motor_speed: 50,
            cycle_motor_speed: 20,

            // Door servo
            servo_open_angle: 90,
            servo_closed_angle: 0,

            // Link
            telemetry_interval_ms: 500, // 2 Hz

            // UV sensing
            uv_sample_count: 10,
        }
    }
}

impl SystemConfig {
    /// Bounds-check every field.
    ///
    /// Called once at startup; the config is immutable afterwards, so a
    /// passing check holds for the life of the process.
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(0.0..=100.0).contains(&self.temperature_threshold_c) {
            return Err(Error::Config("temperature threshold out of range"));
        }
        if !(0.0..=100.0).contains(&self.humidity_threshold_rh) {
            return Err(Error::Config("humidity threshold out of range"));
        }
        if self.remote_motor_speed.abs() > 100 || self.cycle_motor_speed.abs() > 100 {
            return Err(Error::Config("motor speed outside -100..=100"));
        }
        if self.servo_open_angle > 180 || self.servo_closed_angle > 180 {
            return Err(Error::Config("servo angle above 180 degrees"));
        }
        if self.telemetry_interval_ms == 0 {
            return Err(Error::Config("telemetry interval must be nonzero"));
        }
        if self.uv_sample_count == 0 {
            return Err(Error::Config("UV sample count must be nonzero"));
        }
        Ok(())
    }
}
