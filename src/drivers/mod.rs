//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod buzzer;
pub mod fan;
pub mod hw_init;
pub mod hw_timer;
pub mod keypad;
pub mod lamp;
pub mod motor;
pub mod servo;
pub mod uart;
pub mod watchdog;
