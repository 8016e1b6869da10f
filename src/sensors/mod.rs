//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every sensor driver; the hardware adapter forwards the
//! `SensorPort` reads to it one at a time so the climate probe's error
//! path stays visible to the service.

pub mod dht;
pub mod proximity;
pub mod uv;

use crate::error::SensorError;
use crate::mode::context::ClimateReading;
use dht::DhtProbe;
use proximity::ProximitySensor;
use uv::UvSensor;

/// Aggregates all sensor drivers.
pub struct SensorHub {
    pub climate: DhtProbe,
    pub uv: UvSensor,
    pub proximity: ProximitySensor,
}

impl SensorHub {
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(climate: DhtProbe, uv: UvSensor, proximity: ProximitySensor) -> Self {
        Self {
            climate,
            uv,
            proximity,
        }
    }

    /// One probe transfer; the service holds the last good reading
    /// through failures.
    pub fn read_climate(&mut self) -> Result<ClimateReading, SensorError> {
        self.climate.read()
    }

    /// Banded UV level, 0..=11.
    pub fn read_uv_level(&mut self) -> u8 {
        self.uv.read_level()
    }

    /// Object present at the door throat.
    pub fn read_proximity(&mut self) -> bool {
        self.proximity.read()
    }
}
