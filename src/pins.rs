//! GPIO / peripheral pin assignments for the SteriCab main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Switched actuators (logic-level MOSFET low-side drivers)
// ---------------------------------------------------------------------------

/// Digital output: circulation fan (active HIGH).
pub const FAN_GPIO: i32 = 1;
/// Digital output: UV-C lamp ballast enable (active HIGH).
pub const LAMP_GPIO: i32 = 2;
/// Digital output: piezo buzzer (active HIGH).
pub const BUZZER_GPIO: i32 = 3;

// ---------------------------------------------------------------------------
// Stirring motor (DRV8871 H-bridge)
// ---------------------------------------------------------------------------

/// LEDC PWM output for motor speed control.
pub const MOTOR_PWM_GPIO: i32 = 4;
/// Digital output: HIGH = forward, LOW = reverse.
pub const MOTOR_DIR_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Door servo (standard 50 Hz hobby servo)
// ---------------------------------------------------------------------------

/// LEDC PWM output for the door servo signal line.
pub const SERVO_PWM_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// DHT-class climate probe — single-wire data line (open-drain, external
/// pull-up).
pub const DHT_GPIO: i32 = 7;

/// UV photodiode amplifier — analog voltage.
/// ADC1 channel 7 (GPIO 8 on ESP32-S3).
pub const UV_ADC_GPIO: i32 = 8;
/// ADC attenuation for the UV input (12 dB → 0 – 3.1 V range).
pub const UV_ADC_ATTEN: u32 = 3; // adc_atten_t_ADC_ATTEN_DB_12

/// IR proximity sensor at the door throat. Pull-up input; the module
/// grounds the line while an object is present.
pub const PROXIMITY_GPIO: i32 = 9;

// ---------------------------------------------------------------------------
// 4x4 matrix keypad (rows driven, columns read with pull-ups)
// ---------------------------------------------------------------------------

/// Row drive outputs, top row first.
pub const KEYPAD_ROW_GPIOS: [i32; 4] = [10, 11, 12, 13];
/// Column sense inputs, left column first. Active LOW when a key in the
/// driven row is down.
pub const KEYPAD_COL_GPIOS: [i32; 4] = [14, 15, 16, 17];

// ---------------------------------------------------------------------------
// Wireless bridge UART
// ---------------------------------------------------------------------------

/// UART2 to the transparent serial radio module, 9600 8N1.
pub const LINK_UART_TX_GPIO: i32 = 18;
pub const LINK_UART_RX_GPIO: i32 = 21;
pub const LINK_UART_BAUD: u32 = 9600;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC resolution for the motor channel (8-bit → 0 – 255 duty levels).
pub const MOTOR_PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC base frequency for the motor (25 kHz — inaudible).
pub const MOTOR_PWM_FREQ_HZ: u32 = 25_000;

/// LEDC resolution for the servo channel. 14-bit at 50 Hz gives ~1.2 µs
/// per duty step across the 20 ms frame.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;
/// Standard hobby-servo frame rate.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
