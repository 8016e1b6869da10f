//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to the console UART / USB-CDC in
//! production).  A future display or host-diagnostics adapter would
//! implement the same trait.

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(mode) => {
                info!("START | mode={mode}");
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE  | {from} -> {to}");
            }
            AppEvent::KeyPressed(code) => {
                info!("KEY   | code={code}");
            }
            AppEvent::FrameReceived(frame) => {
                info!(
                    "FRAME | flags=0b{:05b} uv={} servo={} fan={} motor={} toggle={}",
                    frame.flags(),
                    u8::from(frame.uv),
                    u8::from(frame.servo),
                    u8::from(frame.fan),
                    u8::from(frame.motor),
                    u8::from(frame.mode_toggle),
                );
            }
            AppEvent::FrameRejected(err) => {
                warn!("FRAME | rejected ({err})");
            }
            AppEvent::SensorStale => {
                warn!("PROBE | stale, holding last good reading");
            }
            AppEvent::SensorRecovered => {
                info!("PROBE | recovered");
            }
            AppEvent::TelemetrySent(report) => {
                debug!(
                    "TELEM | seq={} mode={} uv={} T={:.1}\u{00b0}C H={:.1}%{}",
                    report.sequence,
                    report.mode,
                    report.uv_level,
                    report.temperature_c,
                    report.humidity_rh,
                    if report.stale { " (stale)" } else { "" },
                );
            }
        }
    }
}
