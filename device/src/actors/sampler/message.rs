use crate::domain::{Decimal, SensorAcquisition};
use core::fmt::Write;
use heapless::String;

/// Sized for the widest values [`Decimal`] can print.
pub const MESSAGE_CAPACITY: usize = 48;

/// Payload sent to the gateway: `t <temperature, 1 dp>,H <humidity, 0 dp>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message(String<MESSAGE_CAPACITY>);

impl Message {
    pub fn new(acquisition: &SensorAcquisition) -> Self {
        let mut text = String::new();
        let _ = write!(
            text,
            "t {},H {}",
            Decimal::new(acquisition.temperature, 1),
            Decimal::new(acquisition.relative_humidity, 0)
        );
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}
