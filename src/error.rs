//! Unified error types for the SteriCab firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level control loop's error handling uniform. All variants are `Copy`
//! so they can be cheaply carried through the snapshot builder and event
//! sinks without allocation.
//!
//! Nothing in this taxonomy is fatal: a failed climate read degrades to a
//! stale snapshot and a rejected frame degrades to a status code. Only
//! peripheral bring-up errors abort, and those happen before `main` enters
//! the control loop.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read or returned inconsistent data.
    Sensor(SensorError),
    /// An inbound command frame failed validation.
    Frame(FrameError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Frame(e) => write!(f, "frame: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Climate probe read failures.
///
/// The probe is a single-wire device with its own on-wire checksum; any of
/// these leaves the previous successful reading in force (marked stale).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Probe did not pull the bus low in response to the start pulse.
    NoResponse,
    /// A bit slot exceeded its maximum width mid-transfer.
    Timeout,
    /// The probe's checksum byte does not match the four data bytes.
    ChecksumMismatch,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResponse => write!(f, "no response to start pulse"),
            Self::Timeout => write!(f, "bit transfer timed out"),
            Self::ChecksumMismatch => write!(f, "checksum mismatch"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Frame errors
// ---------------------------------------------------------------------------

/// Inbound command frame rejection reasons.
///
/// Counted per category by `events::record_frame_error` and surfaced as the
/// link status on the display; the decoder resynchronises on the next
/// header byte, so a reject never stalls the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Checksum byte does not match the flags byte.
    Checksum,
    /// Trailer byte missing where the frame should end.
    Framing,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checksum => write!(f, "checksum mismatch"),
            Self::Framing => write!(f, "bad trailer"),
        }
    }
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self {
        Self::Frame(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
