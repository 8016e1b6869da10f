//! Wireless serial link: frame formats and codec.
//!
//! The cabinet talks to its paired remote over a transparent UART radio
//! bridge. Two fixed-length binary frames exist:
//!
//! - inbound command, 4 bytes:
//!   `0xA5 | flags | checksum | 0x5A`
//! - outbound telemetry, 10 bytes:
//!   `0xA5 | seq_hi | seq_lo | uv | humi_int | humi_frac | temp_int | temp_frac | checksum | 0x5A`
//!
//! The checksum is the additive sum, modulo 256, of the payload bytes
//! between header and checksum (one byte inbound, seven outbound). There is
//! no length field; both lengths are protocol-fixed. Delivery is
//! best-effort with no acknowledgement or retransmission in either
//! direction.

pub mod decoder;
pub mod telemetry;

pub use decoder::CommandDecoder;
pub use telemetry::TelemetryFrame;

use crate::error::FrameError;

/// Frame start marker, both directions.
pub const FRAME_HEADER: u8 = 0xA5;
/// Frame end marker, both directions.
pub const FRAME_TRAILER: u8 = 0x5A;

/// Total inbound command frame length in bytes.
pub const COMMAND_FRAME_LEN: usize = 4;
/// Total outbound telemetry frame length in bytes.
pub const TELEMETRY_FRAME_LEN: usize = 10;

// Command flags byte layout. Bits 5-7 are reserved and ignored on receive.
const FLAG_UV: u8 = 1 << 0;
const FLAG_SERVO: u8 = 1 << 1;
const FLAG_FAN: u8 = 1 << 2;
const FLAG_MOTOR: u8 = 1 << 3;
const FLAG_MODE_TOGGLE: u8 = 1 << 4;

/// Additive checksum over a payload window, modulo 256.
pub fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// One decoded inbound command.
///
/// An all-zero flags byte is a valid frame (everything off), not an idle
/// marker. Consumed once by input dispatch, then discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandFrame {
    /// UV lamp on.
    pub uv: bool,
    /// Door servo to the open angle (closed angle when clear).
    pub servo: bool,
    /// Circulation fan on.
    pub fan: bool,
    /// Stirring motor at the remote preset speed (stopped when clear).
    pub motor: bool,
    /// Advance the operating mode one step.
    pub mode_toggle: bool,
}

impl CommandFrame {
    /// Unpack a flags byte. Reserved bits are dropped.
    pub const fn from_flags(flags: u8) -> Self {
        Self {
            uv: flags & FLAG_UV != 0,
            servo: flags & FLAG_SERVO != 0,
            fan: flags & FLAG_FAN != 0,
            motor: flags & FLAG_MOTOR != 0,
            mode_toggle: flags & FLAG_MODE_TOGGLE != 0,
        }
    }

    /// Pack back into a flags byte (reserved bits zero).
    pub const fn flags(&self) -> u8 {
        (self.uv as u8) * FLAG_UV
            | (self.servo as u8) * FLAG_SERVO
            | (self.fan as u8) * FLAG_FAN
            | (self.motor as u8) * FLAG_MOTOR
            | (self.mode_toggle as u8) * FLAG_MODE_TOGGLE
    }
}

/// Outcome of feeding one byte to the [`CommandDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEvent {
    /// Mid-frame; nothing to report.
    None,
    /// A complete, valid command frame.
    Ready(CommandFrame),
    /// A candidate frame failed validation and was dropped.
    Rejected(FrameError),
}
