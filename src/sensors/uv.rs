//! UV photodiode on an ADC channel, reported as a banded level.
//!
//! Raw counts are averaged over a configurable number of samples, then
//! banded into 0 (dark) through 11 (saturated) with the product's fixed
//! calibration table. Downstream consumers only ever see the band, so
//! ADC noise inside one band is invisible.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the oneshot ADC channel initialised by hw_init.
//! On host/test: reads from a static `AtomicU16` for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

#[cfg(not(target_os = "espidf"))]
static SIM_UV_ADC: AtomicU16 = AtomicU16::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_uv_adc(raw: u16) {
    SIM_UV_ADC.store(raw, Ordering::Relaxed);
}

/// Band lower edges in averaged ADC counts. An average at or above
/// `BAND_EDGES[n]` reports at least level `n + 1`; below the first edge
/// reports 0.
const BAND_EDGES: [u16; 11] = [227, 318, 408, 503, 606, 696, 795, 881, 976, 1079, 1170];

/// Highest reportable level.
pub const MAX_LEVEL: u8 = 11;

pub struct UvSensor {
    sample_count: u16,
    _adc_gpio: i32,
}

impl UvSensor {
    pub fn new(adc_gpio: i32, sample_count: u16) -> Self {
        Self {
            sample_count: sample_count.max(1),
            _adc_gpio: adc_gpio,
        }
    }

    /// Averaged-and-banded level, 0..=11.
    pub fn read_level(&mut self) -> u8 {
        let mut sum: u32 = 0;
        for _ in 0..self.sample_count {
            sum += u32::from(self.read_adc());
        }
        let avg = (sum / u32::from(self.sample_count)) as u16;
        band_for(avg)
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        hw_init::adc1_read(hw_init::ADC1_CH_UV)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_UV_ADC.load(Ordering::Relaxed)
    }
}

/// Band an averaged ADC value into a level.
pub fn band_for(avg: u16) -> u8 {
    // Partition point = number of edges at or below the value = the level.
    BAND_EDGES.partition_point(|&edge| avg >= edge) as u8
}
