//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — log to serial, mirror onto a
//! diagnostic console, capture in tests, etc.

use crate::error::FrameError;
use crate::link::CommandFrame;
use crate::mode::OperatingMode;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The application service has started (carries the initial mode).
    Started(OperatingMode),

    /// The operating mode rotated.
    ModeChanged {
        from: OperatingMode,
        to: OperatingMode,
    },

    /// A debounced keypad press was accepted (code 1..=16).
    KeyPressed(u8),

    /// A validated inbound frame was taken off the queue.
    FrameReceived(CommandFrame),

    /// The receive path rejected at least one inbound frame since the
    /// previous main-loop pass.
    FrameRejected(FrameError),

    /// The climate probe stopped answering; the loop now runs on the
    /// last good reading.
    SensorStale,

    /// The climate probe answered again after being stale.
    SensorRecovered,

    /// A telemetry frame went out on the radio link.
    TelemetrySent(TelemetryReport),
}

/// A point-in-time summary of what the last telemetry frame carried.
#[derive(Debug, Clone)]
pub struct TelemetryReport {
    pub sequence: u16,
    pub mode: OperatingMode,
    pub uv_level: u8,
    pub temperature_c: f32,
    pub humidity_rh: f32,
    /// True when the climate fields are a held-over reading.
    pub stale: bool,
}
