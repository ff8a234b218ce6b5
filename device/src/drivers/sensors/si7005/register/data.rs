use crate::domain::ReadingKind;
use embedded_hal_async::i2c::*;

// DATAh, auto-incremented into DATAl
const DATA_H: u8 = 0x01;

/// The two bytes of the data register after a conversion, most significant
/// first. The low bits carry status and are shifted out on conversion.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RawRegisterPair(pub [u8; 2]);

impl RawRegisterPair {
    pub async fn read<I: I2c>(address: u8, i2c: &mut I) -> Result<RawRegisterPair, I::Error> {
        let mut buf = [0; 2];
        i2c.write_read(address, &[DATA_H], &mut buf).await?;
        Ok(RawRegisterPair(buf))
    }

    fn raw16(&self) -> u16 {
        u16::from_be_bytes(self.0)
    }

    /// Temperature(°C) = (DATA >> 2) / 32 - 50
    pub fn temperature(&self) -> f32 {
        (self.raw16() >> 2) as f32 / 32.0 - 50.0
    }

    /// Humidity(%RH) = (DATA >> 4) / 16 - 24
    pub fn humidity(&self) -> f32 {
        (self.raw16() >> 4) as f32 / 16.0 - 24.0
    }

    pub fn convert(&self, kind: ReadingKind) -> f32 {
        match kind {
            ReadingKind::Temperature => self.temperature(),
            ReadingKind::Humidity => self.humidity(),
        }
    }
}
