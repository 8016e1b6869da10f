//! Port traits — the hexagonal boundary between domain logic and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, keypad, radio link, display,
//! event sinks) implement these traits. The
//! [`AppService`](super::service::AppService) consumes them via generics,
//! so the control core never touches hardware directly and every test
//! runs against mocks.

use crate::error::SensorError;
use crate::link::CommandFrame;
use crate::mode::context::{ClimateReading, SensorSnapshot};
use crate::mode::OperatingMode;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to rebuild the snapshot.
///
/// All three reads are blocking-but-bounded; the climate probe is the
/// only fallible one (single-wire transfer with its own checksum).
pub trait SensorPort {
    fn read_climate(&mut self) -> Result<ClimateReading, SensorError>;

    /// Banded UV intensity, 0..=11.
    fn read_uv_level(&mut self) -> u8;

    /// True while an object sits at the door throat.
    fn read_proximity(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
///
/// All operations are idempotent; the service additionally diffs
/// commands so repeated values never reach hardware.
pub trait ActuatorPort {
    fn set_fan(&mut self, on: bool);
    fn set_lamp(&mut self, on: bool);
    fn set_buzzer(&mut self, on: bool);

    /// Signed speed, -100..=100; 0 stops and releases the driver.
    fn set_motor_speed(&mut self, speed: i16);

    /// Door angle in degrees, 0..=180.
    fn set_servo_angle(&mut self, degrees: u16);
}

// ───────────────────────────────────────────────────────────────
// Keypad port
// ───────────────────────────────────────────────────────────────

/// One debounced keypad poll per main-loop pass.
///
/// Returns 0 when no new press is pending; a nonzero code (1..=16) is
/// reported exactly once per press. Implementations must not block
/// past their debounce confirm.
pub trait KeypadPort {
    fn poll_key(&mut self) -> u8;
}

// ───────────────────────────────────────────────────────────────
// Radio link port (both directions of the wireless bridge)
// ───────────────────────────────────────────────────────────────

/// The serial radio bridge: decoded inbound frames in, raw telemetry
/// bytes out.
///
/// Inbound frames were already validated in the receive context; this
/// port only hands over completed [`CommandFrame`]s plus the reject
/// bookkeeping for the status surface.
pub trait LinkPort {
    /// Take the oldest pending inbound frame, if any.
    fn take_frame(&mut self) -> Option<CommandFrame>;

    /// Cumulative (checksum, framing) reject counts since boot.
    fn reject_counts(&self) -> (u32, u32);

    /// Frames lost to a full inbound queue since boot.
    fn dropped_count(&self) -> u32;

    /// Send one byte, blocking until the transmitter accepts it. The
    /// wait is bounded by the UART rate.
    fn write_byte(&mut self, byte: u8);

    /// Send a whole frame byte-by-byte.
    fn send_frame(&mut self, frame: &[u8]) {
        for &byte in frame {
            self.write_byte(byte);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Display port
// ───────────────────────────────────────────────────────────────

/// Most recent inbound link outcome, for the status surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStatus {
    /// Nothing received yet.
    #[default]
    Idle,
    /// Last frame parsed cleanly.
    FrameOk,
    /// Last activity was a checksum reject.
    ChecksumError,
    /// Last activity was a framing reject.
    FramingError,
}

impl LinkStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::FrameOk => "ok",
            Self::ChecksumError => "cksum!",
            Self::FramingError => "frame!",
        }
    }
}

/// Everything the status display shows, assembled once per main-loop
/// pass.
#[derive(Debug, Clone, Copy)]
pub struct DisplayView {
    pub snapshot: SensorSnapshot,
    pub mode: OperatingMode,
    /// Last keypad code seen (0 until the first press).
    pub last_key: u8,
    pub link: LinkStatus,
    pub uptime_secs: u32,
}

/// Render-side port. Called once per main-loop pass; suppressing
/// unchanged output is the implementation's job, not the core's.
pub trait DisplayPort {
    fn render(&mut self, view: &DisplayView);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / diagnostics)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, test
/// capture, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
