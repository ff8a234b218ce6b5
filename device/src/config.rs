//! Deployment constants and the configuration of the sampling loop.

use crate::traits::radio::{DeviceAddress, RadioConfig};
use embassy_time::Duration;

/// 7-bit bus address of the Si7005.
pub const SENSOR_BUS_ADDRESS: u8 = crate::drivers::sensors::si7005::ADDR;

/// Bus clock the board should configure for the sensor.
pub const BUS_FREQUENCY_HZ: u32 = 400_000;

/// Upper bound on a single bus transaction.
pub const BUS_TRANSACTION_TIMEOUT: Duration = Duration::from_millis(1000);

pub const SAMPLING_PERIOD: Duration = Duration::from_secs(300);
pub const INITIAL_DELAY: Duration = Duration::from_secs(15);

/// How long a sent message may go without a transmit-complete before it is
/// considered lost.
pub const TRANSMIT_TIMEOUT: Duration = Duration::from_secs(30);

pub const RADIO_FREQUENCY_HZ: u32 = 915_000_000;

pub const DEVICE_ADDRESS: DeviceAddress = DeviceAddress::new(b"Netduino1");
pub const GATEWAY_ADDRESS: DeviceAddress = DeviceAddress::new(b"LoRaIoT1");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeConfig {
    pub radio: RadioConfig,
    /// Address this node listens on.
    pub address: DeviceAddress,
    /// Address readings are sent to.
    pub gateway: DeviceAddress,
    pub period: Duration,
    pub initial_delay: Duration,
    pub transmit_timeout: Duration,
}

impl NodeConfig {
    pub const fn new() -> Self {
        Self {
            radio: RadioConfig::new(RADIO_FREQUENCY_HZ)
                .pa_boost(true)
                .rx_payload_crc(true),
            address: DEVICE_ADDRESS,
            gateway: GATEWAY_ADDRESS,
            period: SAMPLING_PERIOD,
            initial_delay: INITIAL_DELAY,
            transmit_timeout: TRANSMIT_TIMEOUT,
        }
    }

    pub const fn radio(mut self, radio: RadioConfig) -> Self {
        self.radio = radio;
        self
    }

    pub const fn address(mut self, address: DeviceAddress) -> Self {
        self.address = address;
        self
    }

    pub const fn gateway(mut self, gateway: DeviceAddress) -> Self {
        self.gateway = gateway;
        self
    }

    pub const fn period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub const fn initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    pub const fn transmit_timeout(mut self, transmit_timeout: Duration) -> Self {
        self.transmit_timeout = transmit_timeout;
        self
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NodeConfig::default();
        assert_eq!(915_000_000, config.radio.frequency_hz);
        assert!(config.radio.pa_boost);
        assert!(config.radio.rx_payload_crc);
        assert_eq!(b"Netduino1", config.address.as_bytes());
        assert_eq!(b"LoRaIoT1", config.gateway.as_bytes());
        assert_eq!(300, config.period.as_secs());
        assert_eq!(15, config.initial_delay.as_secs());
        assert_eq!(0x40, SENSOR_BUS_ADDRESS);
    }
}
