//! Stirring motor driver (DRV8871 H-bridge).
//!
//! Signed-speed control: magnitude becomes the 8-bit LEDC duty, sign
//! becomes the direction pin. Speed 0 drops the duty to zero and parks
//! the direction pin forward so the bridge coasts.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives real PWM and GPIO via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

pub struct MotorDriver {
    speed: i16,
}

impl Default for MotorDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MotorDriver {
    pub fn new() -> Self {
        Self { speed: 0 }
    }

    /// Set signed speed; values outside -100..=100 are clamped.
    pub fn set_speed(&mut self, speed: i16) {
        let speed = speed.clamp(-100, 100);

        let forward = speed >= 0;
        let magnitude = speed.unsigned_abs();
        let duty_8bit = u32::from(magnitude) * 255 / 100;

        hw_init::gpio_write(pins::MOTOR_DIR_GPIO, forward);
        hw_init::ledc_set(hw_init::LEDC_CH_MOTOR, duty_8bit);

        self.speed = speed;
    }

    pub fn stop(&mut self) {
        self.set_speed(0);
    }

    pub fn current_speed(&self) -> i16 {
        self.speed
    }

    pub fn is_running(&self) -> bool {
        self.speed != 0
    }
}
