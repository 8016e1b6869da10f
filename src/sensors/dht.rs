//! DHT11-class combined temperature/humidity probe, single-wire.
//!
//! One read is a full transfer: an 18 ms host start pulse, the probe's
//! 80 µs + 80 µs response, then 40 data bits (humidity int/tenths,
//! temperature int/tenths, checksum). The checksum byte is the low
//! eight bits of the sum of the four data bytes.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-banged over one GPIO via the hw_init shims, with
//! busy-wait timeouts on every edge so a dead or wedged probe costs a
//! bounded ~8 ms worst case instead of hanging the loop.
//! On host/test: reads injectable statics, including a forced-failure
//! flag for stale-path tests.

use crate::error::SensorError;
use crate::mode::context::ClimateReading;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

#[cfg(not(target_os = "espidf"))]
static SIM_CLIMATE: AtomicU32 = AtomicU32::new(0x18_07_37_02); // 24.7 C / 55.2 %RH
#[cfg(not(target_os = "espidf"))]
static SIM_FAILING: AtomicBool = AtomicBool::new(false);

/// Inject the probe reading for host builds.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_climate(temp_int: u8, temp_frac: u8, humi_int: u8, humi_frac: u8) {
    let packed = u32::from(temp_int) << 24
        | u32::from(temp_frac) << 16
        | u32::from(humi_int) << 8
        | u32::from(humi_frac);
    SIM_CLIMATE.store(packed, Ordering::Relaxed);
}

/// Make every host read fail with `NoResponse` until cleared.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_failing(failing: bool) {
    SIM_FAILING.store(failing, Ordering::Relaxed);
}

/// Microseconds the host start pulse holds the line low.
#[cfg(target_os = "espidf")]
const START_PULSE_US: u32 = 18_000;
/// Longest level we wait for anywhere in the transfer.
#[cfg(target_os = "espidf")]
const LEVEL_TIMEOUT_US: u32 = 100;
/// High-pulse length separating a 0 bit (~26 µs) from a 1 bit (~70 µs).
#[cfg(target_os = "espidf")]
const BIT_ONE_THRESHOLD_US: u32 = 40;

pub struct DhtProbe {
    _gpio: i32,
}

impl DhtProbe {
    pub fn new(gpio: i32) -> Self {
        Self { _gpio: gpio }
    }

    /// One full probe transfer.
    ///
    /// The datasheet allows at most one read per second; the caller's
    /// loop cadence satisfies that without extra throttling here.
    pub fn read(&mut self) -> Result<ClimateReading, SensorError> {
        let bytes = self.read_bytes()?;

        let sum = bytes[0]
            .wrapping_add(bytes[1])
            .wrapping_add(bytes[2])
            .wrapping_add(bytes[3]);
        if sum != bytes[4] {
            return Err(SensorError::ChecksumMismatch);
        }

        // Wire order: humidity int/tenths, then temperature int/tenths.
        Ok(ClimateReading::new(bytes[2], bytes[3], bytes[0], bytes[1]))
    }

    #[cfg(target_os = "espidf")]
    fn read_bytes(&mut self) -> Result<[u8; 5], SensorError> {
        let gpio = self._gpio;

        // Start pulse: hold low 18 ms, release, give the probe 30 µs to
        // take over the line.
        hw_init::gpio_set_output(gpio);
        hw_init::gpio_write(gpio, false);
        hw_init::delay_us(START_PULSE_US);
        hw_init::gpio_write(gpio, true);
        hw_init::delay_us(30);
        hw_init::gpio_set_input(gpio);

        // Probe response: 80 µs low then 80 µs high.
        self.wait_level(gpio, false, LEVEL_TIMEOUT_US)
            .map_err(|_| SensorError::NoResponse)?;
        self.wait_level(gpio, true, LEVEL_TIMEOUT_US)
            .map_err(|_| SensorError::NoResponse)?;
        self.wait_level(gpio, false, LEVEL_TIMEOUT_US)
            .map_err(|_| SensorError::NoResponse)?;

        let mut bytes = [0u8; 5];
        for byte in &mut bytes {
            for _ in 0..8 {
                // 50 µs low preamble, then the length of the high pulse
                // encodes the bit.
                self.wait_level(gpio, true, LEVEL_TIMEOUT_US)?;
                let high_us = self.measure_high(gpio, LEVEL_TIMEOUT_US)?;
                *byte = (*byte << 1) | u8::from(high_us > BIT_ONE_THRESHOLD_US);
            }
        }
        Ok(bytes)
    }

    /// Busy-wait until the line reads `level`; `Timeout` after `max_us`.
    #[cfg(target_os = "espidf")]
    fn wait_level(&self, gpio: i32, level: bool, max_us: u32) -> Result<(), SensorError> {
        let mut waited = 0;
        while hw_init::gpio_read(gpio) != level {
            if waited >= max_us {
                return Err(SensorError::Timeout);
            }
            hw_init::delay_us(1);
            waited += 1;
        }
        Ok(())
    }

    /// Measure how long the line stays high, up to `max_us`.
    #[cfg(target_os = "espidf")]
    fn measure_high(&self, gpio: i32, max_us: u32) -> Result<u32, SensorError> {
        let mut high_us = 0;
        while hw_init::gpio_read(gpio) {
            if high_us >= max_us {
                return Err(SensorError::Timeout);
            }
            hw_init::delay_us(1);
            high_us += 1;
        }
        Ok(high_us)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_bytes(&mut self) -> Result<[u8; 5], SensorError> {
        if SIM_FAILING.load(Ordering::Relaxed) {
            return Err(SensorError::NoResponse);
        }
        let packed = SIM_CLIMATE.load(Ordering::Relaxed);
        let temp_int = (packed >> 24) as u8;
        let temp_frac = (packed >> 16) as u8;
        let humi_int = (packed >> 8) as u8;
        let humi_frac = packed as u8;
        let sum = humi_int
            .wrapping_add(humi_frac)
            .wrapping_add(temp_int)
            .wrapping_add(temp_frac);
        Ok([humi_int, humi_frac, temp_int, temp_frac, sum])
    }
}
