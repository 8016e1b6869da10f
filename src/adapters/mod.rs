//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to                |
//! |------------|--------------------|----------------------------|
//! | `hardware` | SensorPort         | probe, ADC, IR input       |
//! |            | ActuatorPort       | GPIO switches, PWM         |
//! |            | KeypadPort         | 4x4 matrix scanner         |
//! |            | LinkPort           | frame queue + link UART    |
//! | `display`  | DisplayPort        | logger-backed status rows  |
//! | `log_sink` | EventSink          | serial log output          |

pub mod display;
pub mod hardware;
pub mod log_sink;
