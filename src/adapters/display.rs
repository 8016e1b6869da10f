//! Status display adapter backed by the logger.
//!
//! Renders the [`DisplayView`] as four fixed rows, the way the cabinet's
//! character panel lays them out:
//!
//! ```text
//! MODE MANUAL UP 42s
//! T  24.7C  H  55.2%
//! UV  5  DOOR clear
//! LINK ok     KEY 16
//! ```
//!
//! The service renders every main-loop pass; this adapter diffs each row
//! against what it last wrote and only logs rows that changed, so the
//! console stays readable at a multi-kHz loop rate.

use core::fmt::Write;

use heapless::String;
use log::info;

use crate::app::ports::{DisplayPort, DisplayView};

/// Characters per display row.
const ROW_LEN: usize = 32;
const ROWS: usize = 4;

/// Logger-backed implementation of [`DisplayPort`].
pub struct LogDisplay {
    rows: [String<ROW_LEN>; ROWS],
}

impl LogDisplay {
    pub fn new() -> Self {
        Self {
            rows: [const { String::new() }; ROWS],
        }
    }

    fn compose(view: &DisplayView) -> [String<ROW_LEN>; ROWS] {
        let mut rows = [const { String::new() }; ROWS];
        let climate = &view.snapshot.climate;

        let _ = write!(
            rows[0],
            "MODE {:<6} UP {}s",
            view.mode.name(),
            view.uptime_secs
        );
        let _ = write!(
            rows[1],
            "T {:>5.1}C  H {:>5.1}%{}",
            climate.temperature_c(),
            climate.humidity_rh(),
            if view.snapshot.climate_stale { " *" } else { "" }
        );
        let _ = write!(
            rows[2],
            "UV {:>2}  DOOR {}",
            view.snapshot.uv_level,
            if view.snapshot.proximity { "blocked" } else { "clear" }
        );
        let _ = write!(
            rows[3],
            "LINK {:<6} KEY {}",
            view.link.label(),
            view.last_key
        );
        rows
    }
}

impl Default for LogDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPort for LogDisplay {
    fn render(&mut self, view: &DisplayView) {
        let fresh = Self::compose(view);
        for (index, row) in fresh.iter().enumerate() {
            if *row != self.rows[index] {
                info!("DISP{index} | {row}");
            }
        }
        self.rows = fresh;
    }
}
