//! Shared control-loop context: snapshot in, commands out.
//!
//! `ControlContext` is the blackboard the mode policies read from and
//! write to. The service rebuilds the sensor snapshot each main-loop pass
//! and applies the actuator commands afterwards; policies never touch
//! hardware ports directly.

use crate::config::SystemConfig;

// ---------------------------------------------------------------------------
// Climate reading (probe wire format: integer + tenths)
// ---------------------------------------------------------------------------

/// One temperature/humidity pair as the probe reports it.
///
/// Kept in integer + tenths form end-to-end; the telemetry frame carries
/// these bytes verbatim and float conversion happens only at threshold
/// comparisons and display formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClimateReading {
    pub temperature_int: u8,
    pub temperature_frac: u8,
    pub humidity_int: u8,
    pub humidity_frac: u8,
}

impl ClimateReading {
    pub const fn new(temp_int: u8, temp_frac: u8, humi_int: u8, humi_frac: u8) -> Self {
        Self {
            temperature_int: temp_int,
            temperature_frac: temp_frac,
            humidity_int: humi_int,
            humidity_frac: humi_frac,
        }
    }

    pub fn temperature_c(&self) -> f32 {
        f32::from(self.temperature_int) + f32::from(self.temperature_frac) / 10.0
    }

    pub fn humidity_rh(&self) -> f32 {
        f32::from(self.humidity_int) + f32::from(self.humidity_frac) / 10.0
    }
}

// ---------------------------------------------------------------------------
// Sensor snapshot (read-only to policies; rebuilt by the service)
// ---------------------------------------------------------------------------

/// A point-in-time snapshot of every sensor in the cabinet.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorSnapshot {
    /// Latest climate values. When `climate_stale` is set these are the
    /// last successful reading, frozen, not zeroed.
    pub climate: ClimateReading,
    /// True while the probe is failing; telemetry and display carry the
    /// frozen values plus this marker.
    pub climate_stale: bool,
    /// Banded UV intensity, 0 (dark) to 11 (saturated).
    pub uv_level: u8,
    /// True while the IR sensor sees an object at the door throat.
    pub proximity: bool,
}

// ---------------------------------------------------------------------------
// Actuator commands (written by policies and dispatch; applied by the
// service)
// ---------------------------------------------------------------------------

/// Desired actuator state. The service diffs this against what it last
/// applied, so writing the same value every pass costs nothing at the
/// hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorCommands {
    pub fan: bool,
    pub lamp: bool,
    pub buzzer: bool,
    /// Signed speed, -100..=100; 0 = stopped.
    pub motor_speed: i16,
    /// Door servo angle in degrees, 0..=180.
    pub servo_angle: u16,
}

impl Default for ActuatorCommands {
    fn default() -> Self {
        Self {
            fan: false,
            lamp: false,
            buzzer: false,
            motor_speed: 0,
            servo_angle: 0, // door closed
        }
    }
}

impl ActuatorCommands {
    /// Force fan, lamp, buzzer off and stop the motor.
    ///
    /// The servo is deliberately left where it is: re-homing the door on
    /// every mode change would slam it against whatever is in the
    /// opening.
    pub fn neutralize(&mut self) {
        self.fan = false;
        self.lamp = false;
        self.buzzer = false;
        self.motor_speed = 0;
    }
}

// ---------------------------------------------------------------------------
// ControlContext
// ---------------------------------------------------------------------------

/// Everything a mode policy can see and affect.
#[derive(Debug, Clone)]
pub struct ControlContext {
    /// Latest sensor snapshot; rebuilt by the service before policies run.
    pub snapshot: SensorSnapshot,
    /// Desired actuator state; applied by the service after policies run.
    pub commands: ActuatorCommands,
    /// Immutable for the life of the process.
    pub config: SystemConfig,
}

impl ControlContext {
    pub fn new(config: SystemConfig) -> Self {
        Self {
            snapshot: SensorSnapshot::default(),
            commands: ActuatorCommands::default(),
            config,
        }
    }
}
