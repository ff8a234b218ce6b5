//! Decoding of packets received for this node. Inbound traffic is only logged.

use crate::domain::{Decimal, Uptime};
use crate::fmt::{render, Line};
use crate::traits::radio::Packet;
use core::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    Address,
    Payload,
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Field::Address => "address",
            Field::Payload => "payload",
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("received {field} is not valid UTF-8 (valid up to byte {valid_up_to})")]
pub struct DecodeError {
    pub field: Field,
    pub valid_up_to: usize,
}

fn decode(field: Field, bytes: &[u8]) -> Result<&str, DecodeError> {
    core::str::from_utf8(bytes).map_err(|e| DecodeError {
        field,
        valid_up_to: e.valid_up_to(),
    })
}

/// Renders the diagnostic line for `packet`:
/// `HH:MM:SS-Rfm9X PacketSnr 9.5 Packet RSSI -40dBm RSSI -101dBm = 5 byte message "hello" from "LoRaIoT1"`.
pub fn describe(packet: &Packet, at: Uptime) -> Result<Line, DecodeError> {
    let text = decode(Field::Payload, &packet.payload)?;
    let address = decode(Field::Address, &packet.address)?;
    Ok(render(format_args!(
        "{}-Rfm9X PacketSnr {} Packet RSSI {}dBm RSSI {}dBm = {} byte message \"{}\" from \"{}\"",
        at,
        Decimal::new(packet.snr, 1),
        packet.packet_rssi,
        packet.rssi,
        packet.payload.len(),
        text,
        address
    )))
}
