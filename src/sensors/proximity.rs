//! IR proximity module at the door throat.
//!
//! The module output is active-low: an object in front of the emitter
//! pulls the line to ground. The driver folds that inversion away and
//! reports plain presence.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the pull-up input via hw_init.
//! On host/test: reads from a static `AtomicBool` for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

#[cfg(not(target_os = "espidf"))]
static SIM_PRESENT: AtomicBool = AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_present(present: bool) {
    SIM_PRESENT.store(present, Ordering::Relaxed);
}

pub struct ProximitySensor {
    _gpio: i32,
}

impl ProximitySensor {
    pub fn new(gpio: i32) -> Self {
        Self { _gpio: gpio }
    }

    /// True while an object sits in the beam.
    pub fn read(&self) -> bool {
        self.read_present()
    }

    #[cfg(target_os = "espidf")]
    fn read_present(&self) -> bool {
        // Active-low module: grounded line = object present.
        !hw_init::gpio_read(self._gpio)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_present(&self) -> bool {
        SIM_PRESENT.load(Ordering::Relaxed)
    }
}
