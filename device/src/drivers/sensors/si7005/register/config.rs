use crate::domain::ReadingKind;
use embedded_hal_async::i2c::*;

const CONFIG: u8 = 0x03;

// START (bit 0) with TEMP (bit 4) selecting the temperature channel
const CMD_MEASURE_TEMP: u8 = 0x11;
const CMD_MEASURE_HUMI: u8 = 0x01;

pub struct Config;

impl Config {
    /// Starts a conversion of the requested kind.
    pub async fn start<I: I2c>(address: u8, i2c: &mut I, kind: ReadingKind) -> Result<(), I::Error> {
        i2c.write(address, &[CONFIG, command(kind)]).await
    }
}

fn command(kind: ReadingKind) -> u8 {
    match kind {
        ReadingKind::Temperature => CMD_MEASURE_TEMP,
        ReadingKind::Humidity => CMD_MEASURE_HUMI,
    }
}
