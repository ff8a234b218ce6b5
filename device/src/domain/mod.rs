//! Values produced by the node: individual readings and the pair captured by one
//! sampling cycle.

pub mod decimal;
pub mod uptime;

use core::fmt::{Debug, Formatter};
pub use decimal::Decimal;
pub use uptime::Uptime;

/// Which quantity a reading measures.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadingKind {
    Temperature,
    Humidity,
}

/// One converted measurement. Temperature is in °C, humidity in %RH.
#[derive(Copy, Clone, PartialEq)]
pub struct SensorReading {
    pub kind: ReadingKind,
    pub value: f32,
}

impl SensorReading {
    pub fn new(kind: ReadingKind, value: f32) -> Self {
        Self { kind, value }
    }
}

impl Debug for SensorReading {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ReadingKind::Temperature => write!(f, "{}°C", Decimal::new(self.value, 2)),
            ReadingKind::Humidity => write!(f, "{}%RH", Decimal::new(self.value, 2)),
        }
    }
}

/// Temperature and humidity captured by one sampling cycle.
#[derive(Copy, Clone, PartialEq)]
pub struct SensorAcquisition {
    pub temperature: f32,
    pub relative_humidity: f32,
}

impl Debug for SensorAcquisition {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SensorAcquisition")
            .field("temperature", &self.temperature)
            .field("relative_humidity", &self.relative_humidity)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorAcquisition {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(
            f,
            "SensorAcquisition(temperature: {}, relative_humidity: {})",
            &self.temperature,
            &self.relative_humidity
        );
    }
}
