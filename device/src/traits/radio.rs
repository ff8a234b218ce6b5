//! Contract of the packet radio the node transmits through.
//!
//! The radio driver is an external collaborator. Calls go through [`Radio`];
//! its notifications come back as [`RadioEvent`]s pushed into a [`RadioEvents`]
//! queue that the sampling loop drains, so every trigger is handled on one task.

use core::fmt::{Debug, Display, Formatter};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use heapless::Vec;

/// Largest payload a packet can carry.
pub const MAX_PAYLOAD: usize = 255;

/// Largest endpoint address carried with an inbound packet.
pub const MAX_ADDRESS: usize = 16;

/// Notifications buffered between the radio driver and the sampling loop.
pub const EVENT_QUEUE_DEPTH: usize = 4;

#[allow(async_fn_in_trait)]
pub trait Radio {
    type Error: Debug;

    /// Configure the transceiver.
    async fn initialise(&mut self, config: &RadioConfig) -> Result<(), Self::Error>;

    /// Start listening for packets addressed to `address`.
    async fn receive(&mut self, address: &DeviceAddress) -> Result<(), Self::Error>;

    /// Queue `payload` for `destination`. Returning does not mean it went out:
    /// completion is reported later with [`RadioEvent::TransmitComplete`].
    async fn send(&mut self, destination: &DeviceAddress, payload: &[u8])
        -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RadioConfig {
    pub frequency_hz: u32,
    pub pa_boost: bool,
    pub rx_payload_crc: bool,
}

impl RadioConfig {
    pub const fn new(frequency_hz: u32) -> Self {
        Self {
            frequency_hz,
            pa_boost: false,
            rx_payload_crc: false,
        }
    }

    pub const fn pa_boost(mut self, pa_boost: bool) -> Self {
        self.pa_boost = pa_boost;
        self
    }

    pub const fn rx_payload_crc(mut self, rx_payload_crc: bool) -> Self {
        self.rx_payload_crc = rx_payload_crc;
        self
    }
}

/// Address of a radio endpoint: this node, or the gateway it reports to.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct DeviceAddress(&'static [u8]);

impl DeviceAddress {
    pub const fn new(address: &'static [u8]) -> Self {
        Self(address)
    }

    pub fn as_bytes(&self) -> &'static [u8] {
        self.0
    }
}

impl Display for DeviceAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match core::str::from_utf8(self.0) {
            Ok(text) => f.write_str(text),
            Err(_) => {
                for b in self.0 {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}

impl Debug for DeviceAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "DeviceAddress({})", self)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DeviceAddress {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(f, "DeviceAddress({=[u8]})", self.0);
    }
}

/// A packet received for this node, with the link quality it arrived at.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    pub address: Vec<u8, MAX_ADDRESS>,
    pub payload: Vec<u8, MAX_PAYLOAD>,
    /// Signal-to-noise ratio, dB.
    pub snr: f32,
    /// Packet RSSI, dBm.
    pub packet_rssi: i16,
    /// Ambient RSSI at reception, dBm.
    pub rssi: i16,
}

impl Packet {
    /// Returns `None` when `address` or `payload` exceed the packet capacity.
    pub fn new(
        address: &[u8],
        payload: &[u8],
        snr: f32,
        packet_rssi: i16,
        rssi: i16,
    ) -> Option<Self> {
        Some(Self {
            address: Vec::from_slice(address).ok()?,
            payload: Vec::from_slice(payload).ok()?,
            snr,
            packet_rssi,
            rssi,
        })
    }
}

/// Notifications raised by the radio driver.
#[derive(Debug, Clone, PartialEq)]
pub enum RadioEvent {
    TransmitComplete,
    DataReceived(Packet),
}

pub type RadioEvents = Channel<CriticalSectionRawMutex, RadioEvent, EVENT_QUEUE_DEPTH>;
pub type RadioEventSender<'a> =
    Sender<'a, CriticalSectionRawMutex, RadioEvent, EVENT_QUEUE_DEPTH>;
pub type RadioEventReceiver<'a> =
    Receiver<'a, CriticalSectionRawMutex, RadioEvent, EVENT_QUEUE_DEPTH>;

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use std::string::ToString;

    #[test]
    fn test_address_display() {
        assert_eq!("LoRaIoT1", DeviceAddress::new(b"LoRaIoT1").to_string());
        assert_eq!("ff00", DeviceAddress::new(&[0xff, 0x00]).to_string());
    }

    #[test]
    fn test_packet_capacity() {
        assert!(Packet::new(b"gw", b"hello", 7.5, -40, -100).is_some());
        assert!(Packet::new(&[0; MAX_ADDRESS + 1], b"hello", 7.5, -40, -100).is_none());
        assert!(Packet::new(b"gw", &[0; MAX_PAYLOAD + 1], 7.5, -40, -100).is_none());
    }

    #[test]
    fn test_radio_config_builder() {
        let config = RadioConfig::new(915_000_000)
            .pa_boost(true)
            .rx_payload_crc(true);
        assert_eq!(915_000_000, config.frequency_hz);
        assert!(config.pa_boost);
        assert!(config.rx_payload_crc);
    }
}
