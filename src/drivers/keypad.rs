//! 4x4 matrix keypad scanner.
//!
//! Rows are driven low one at a time; a pressed key pulls its column
//! low. Codes run 1..=16 left-to-right, top-to-bottom, 0 = no key.
//!
//! Debounce is a two-pass confirm spread across main-loop polls: a raw
//! detection becomes a candidate, and only a second matching scan at
//! least [`DEBOUNCE_MS`] later reports the code. The code is reported
//! once per press and the scanner then waits for release. No poll ever
//! blocks beyond the row-settle microseconds.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: scans real GPIOs via hw_init helpers.
//! On host/test: the raw scan reports no key; the confirm logic is
//! exercised directly with synthetic scans.

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

/// Minimum gap between the two confirming scans.
pub const DEBOUNCE_MS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// No contact seen.
    Idle,
    /// First sight of a key; waiting out the debounce gap.
    Candidate { code: u8, seen_at_ms: u32 },
    /// Code reported; swallowing scans until the key lifts.
    Held { code: u8 },
}

pub struct KeypadScanner {
    state: ScanState,
}

impl Default for KeypadScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl KeypadScanner {
    pub fn new() -> Self {
        Self {
            state: ScanState::Idle,
        }
    }

    /// One debounced poll. Returns a code exactly once per press.
    pub fn poll(&mut self, now_ms: u32) -> u8 {
        let raw = self.scan_raw();
        self.advance(raw, now_ms)
    }

    /// Debounce state machine, split from the hardware scan for tests.
    fn advance(&mut self, raw: u8, now_ms: u32) -> u8 {
        match self.state {
            ScanState::Idle => {
                if raw != 0 {
                    self.state = ScanState::Candidate {
                        code: raw,
                        seen_at_ms: now_ms,
                    };
                }
                0
            }
            ScanState::Candidate { code, seen_at_ms } => {
                if raw == 0 {
                    // Contact bounce; drop the candidate.
                    self.state = ScanState::Idle;
                    0
                } else if raw != code {
                    self.state = ScanState::Candidate {
                        code: raw,
                        seen_at_ms: now_ms,
                    };
                    0
                } else if now_ms.wrapping_sub(seen_at_ms) >= DEBOUNCE_MS {
                    self.state = ScanState::Held { code };
                    code
                } else {
                    0
                }
            }
            ScanState::Held { code } => {
                if raw == 0 {
                    self.state = ScanState::Idle;
                } else if raw != code {
                    // Rollover onto a different key mid-hold.
                    self.state = ScanState::Candidate {
                        code: raw,
                        seen_at_ms: now_ms,
                    };
                }
                0
            }
        }
    }

    /// Raw matrix scan; first pressed key wins, 0 when none.
    #[cfg(target_os = "espidf")]
    fn scan_raw(&self) -> u8 {
        let mut code = 0u8;
        'rows: for (row, &row_gpio) in pins::KEYPAD_ROW_GPIOS.iter().enumerate() {
            hw_init::gpio_write(row_gpio, false);
            hw_init::delay_us(5); // line settle
            for (col, &col_gpio) in pins::KEYPAD_COL_GPIOS.iter().enumerate() {
                if !hw_init::gpio_read(col_gpio) {
                    code = (row * 4 + col + 1) as u8;
                    hw_init::gpio_write(row_gpio, true);
                    break 'rows;
                }
            }
            hw_init::gpio_write(row_gpio, true);
        }
        code
    }

    #[cfg(not(target_os = "espidf"))]
    fn scan_raw(&self) -> u8 {
        0
    }
}
