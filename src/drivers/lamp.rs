//! UV-C lamp driver (ballast enable relay).
//!
//! The lamp is a dumb actuator: exposure decisions live in the mode
//! policies and the remote mirror, never here.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real relay GPIO via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

pub struct LampDriver {
    on: bool,
}

impl Default for LampDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl LampDriver {
    pub fn new() -> Self {
        Self { on: false }
    }

    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(pins::LAMP_GPIO, on);
        self.on = on;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
