//! One-shot peripheral bring-up and the register shim layer.
//!
//! `init_peripherals()` runs once from `main()` before the control loop:
//! the ADC oneshot unit for the UV photodiode, GPIO directions for every
//! actuator, sensor and keypad pin, and the LEDC timers/channels behind
//! the motor and servo PWM. The shim functions below it are the only
//! register surface the drivers and sensors touch; host builds get inert
//! twins so the whole driver layer compiles and links without ESP-IDF.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Failures during one-shot bring-up, carrying the IDF return code
/// where the API reports one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    LedcInitFailed,
    UartInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 oneshot init rejected (rc={rc})"),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO direction config rejected (rc={rc})"),
            Self::LedcInitFailed => write!(f, "LEDC timer/channel setup rejected"),
            Self::UartInitFailed(rc) => write!(f, "link UART install rejected (rc={rc})"),
        }
    }
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: runs once on the main task, before the loop starts and
    // before the receive task spawns; nothing else is alive to race
    // these register writes.
    unsafe {
        init_adc()?;
        init_gpio()?;
        init_pwm()?;
    }
    info!("hw_init: peripherals up (ADC1, GPIO, LEDC)");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): no peripherals on the host");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

/// UV photodiode channel: GPIO 8 = ADC1_CH7 on the ESP32-S3.
pub const ADC1_CH_UV: u32 = 7;

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let unit_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: sole write of ADC1_HANDLE, before any reader exists.
    let rc = unsafe { adc_oneshot_new_unit(&unit_cfg, &raw mut ADC1_HANDLE) };
    if rc != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(rc));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: pins::UV_ADC_ATTEN,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    // SAFETY: the handle was created just above.
    let rc = unsafe { adc_oneshot_config_channel(ADC1_HANDLE, ADC1_CH_UV, &chan_cfg) };
    if rc != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(rc));
    }

    info!("hw_init: ADC1 CH{ADC1_CH_UV} ready for the UV photodiode");
    Ok(())
}

/// Raw 12-bit conversion; a failed read reports 0 (dark).
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: the handle is valid once init_adc() returned, and only
    // the main loop calls this, so the oneshot unit is never shared.
    let rc = unsafe { adc_oneshot_read(ADC1_HANDLE, channel, &mut raw) };
    if rc == ESP_OK as i32 {
        raw.max(0) as u16
    } else {
        0
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(_channel: u32) -> u16 {
    0
}

// ── GPIO ──────────────────────────────────────────────────────

/// Configure one pin's direction. Inputs get the internal pull-up: the
/// IR module and the probe bus both idle high, and the keypad columns
/// would float between scans without it.
#[cfg(target_os = "espidf")]
unsafe fn configure_pin(pin: i32, output: bool) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: if output {
            gpio_mode_t_GPIO_MODE_OUTPUT
        } else {
            gpio_mode_t_GPIO_MODE_INPUT
        },
        pull_up_en: if output {
            gpio_pullup_t_GPIO_PULLUP_DISABLE
        } else {
            gpio_pullup_t_GPIO_PULLUP_ENABLE
        },
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: plain config call during single-threaded bring-up.
    let rc = unsafe { gpio_config(&cfg) };
    if rc != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(rc));
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_gpio() -> Result<(), HwInitError> {
    let inputs = [pins::PROXIMITY_GPIO, pins::DHT_GPIO]
        .into_iter()
        .chain(pins::KEYPAD_COL_GPIOS);
    for pin in inputs {
        unsafe { configure_pin(pin, false)? };
    }

    let outputs = [
        pins::FAN_GPIO,
        pins::LAMP_GPIO,
        pins::BUZZER_GPIO,
        pins::MOTOR_DIR_GPIO,
    ]
    .into_iter()
    .chain(pins::KEYPAD_ROW_GPIOS);
    for pin in outputs {
        unsafe { configure_pin(pin, true)? };
        // Actuators start off; keypad rows idle high (the scan drives
        // one row low at a time).
        let idle_high = pins::KEYPAD_ROW_GPIOS.contains(&pin);
        // SAFETY: level write on the pin configured just above.
        unsafe { gpio_set_level(pin, u32::from(idle_high)) };
    }

    info!("hw_init: GPIO directions set");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: level write on a pin init_gpio() configured as an output;
    // the main loop is the only writer.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: level read; no register state is modified.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Host twin reads the pull-up idle level.
#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

/// Re-point a pin at the open-drain output driver (probe handshake).
#[cfg(target_os = "espidf")]
pub fn gpio_set_output(pin: i32) {
    // SAFETY: direction change on a configured pin; main loop only.
    unsafe {
        gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_OUTPUT_OD);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_set_output(_pin: i32) {}

/// Release a pin back to input; the pull-up floats the bus high.
#[cfg(target_os = "espidf")]
pub fn gpio_set_input(pin: i32) {
    // SAFETY: direction change on a configured pin; main loop only.
    unsafe {
        gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_INPUT);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_set_input(_pin: i32) {}

// ── LEDC PWM ─────────────────────────────────────────────────

pub const LEDC_CH_MOTOR: u32 = 0;
pub const LEDC_CH_SERVO: u32 = 1;

#[cfg(target_os = "espidf")]
unsafe fn init_pwm() -> Result<(), HwInitError> {
    // Two independent timers: the motor wants 25 kHz (inaudible), the
    // servo wants a 50 Hz frame with enough resolution to place a
    // 0.5-2.5 ms pulse.
    let timers = [
        (
            ledc_timer_t_LEDC_TIMER_0,
            pins::MOTOR_PWM_RESOLUTION_BITS,
            pins::MOTOR_PWM_FREQ_HZ,
        ),
        (
            ledc_timer_t_LEDC_TIMER_1,
            pins::SERVO_PWM_RESOLUTION_BITS,
            pins::SERVO_PWM_FREQ_HZ,
        ),
    ];
    for (timer_num, duty_resolution, freq_hz) in timers {
        let cfg = ledc_timer_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            timer_num,
            duty_resolution,
            freq_hz,
            clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
            ..Default::default()
        };
        // SAFETY: plain config call during single-threaded bring-up.
        if unsafe { ledc_timer_config(&cfg) } != ESP_OK as i32 {
            return Err(HwInitError::LedcInitFailed);
        }
    }

    let channels = [
        (LEDC_CH_MOTOR, ledc_timer_t_LEDC_TIMER_0, pins::MOTOR_PWM_GPIO),
        (LEDC_CH_SERVO, ledc_timer_t_LEDC_TIMER_1, pins::SERVO_PWM_GPIO),
    ];
    for (channel, timer_sel, gpio_num) in channels {
        let cfg = ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel,
            timer_sel,
            gpio_num,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        };
        // SAFETY: as above; every channel starts parked at duty 0.
        if unsafe { ledc_channel_config(&cfg) } != ESP_OK as i32 {
            return Err(HwInitError::LedcInitFailed);
        }
    }

    info!(
        "hw_init: PWM ready (motor CH{LEDC_CH_MOTOR} {}kHz/{}bit, servo CH{LEDC_CH_SERVO} {}Hz/{}bit)",
        pins::MOTOR_PWM_FREQ_HZ / 1000,
        pins::MOTOR_PWM_RESOLUTION_BITS,
        pins::SERVO_PWM_FREQ_HZ,
        pins::SERVO_PWM_RESOLUTION_BITS
    );
    Ok(())
}

/// Commit a duty value to a LEDC channel (set + update pair).
#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u32) {
    // SAFETY: the channel was bound in init_pwm(); set+update is the
    // two-step commit the LEDC API requires.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u32) {}

// ── Microsecond delay ─────────────────────────────────────────

/// Busy-wait `us` microseconds (single-wire probe bit timing).
#[cfg(target_os = "espidf")]
pub fn delay_us(us: u32) {
    // SAFETY: calibrated ROM spin loop, callable from any context.
    unsafe {
        esp_rom_delay_us(us);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn delay_us(_us: u32) {}
