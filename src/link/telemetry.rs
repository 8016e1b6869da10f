//! Outbound telemetry frame encoder.
//!
//! The mirror of the command decoder: a fixed 10-byte frame carrying the
//! current snapshot values plus a wrapping sequence counter. The peer uses
//! the sequence to spot gaps; there is no acknowledgement, so a gap is
//! information, not an error.

use super::{checksum, FRAME_HEADER, FRAME_TRAILER, TELEMETRY_FRAME_LEN};

/// One outbound telemetry report, pre-encoding.
///
/// Climate values are integer + tenths pairs exactly as the probe reports
/// them; no float conversion happens on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryFrame {
    pub sequence: u16,
    pub uv_level: u8,
    pub humidity_int: u8,
    pub humidity_frac: u8,
    pub temperature_int: u8,
    pub temperature_frac: u8,
}

impl TelemetryFrame {
    /// Encode to the fixed wire format.
    ///
    /// Layout: `header, seq_hi, seq_lo, uv, humi_int, humi_frac, temp_int,
    /// temp_frac, checksum, trailer`; checksum covers the seven payload
    /// bytes between header and checksum.
    pub fn encode(&self) -> [u8; TELEMETRY_FRAME_LEN] {
        let mut out = [0u8; TELEMETRY_FRAME_LEN];
        out[0] = FRAME_HEADER;
        out[1] = (self.sequence >> 8) as u8;
        out[2] = self.sequence as u8;
        out[3] = self.uv_level;
        out[4] = self.humidity_int;
        out[5] = self.humidity_frac;
        out[6] = self.temperature_int;
        out[7] = self.temperature_frac;
        out[8] = checksum(&out[1..8]);
        out[9] = FRAME_TRAILER;
        out
    }
}
