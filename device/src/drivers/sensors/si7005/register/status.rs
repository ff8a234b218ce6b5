use embedded_hal_async::i2c::*;

const STATUS: u8 = 0x00;

// /RDY: set while a conversion is in progress
const STATUS_RDY_MASK: u8 = 0b0000_0001;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Status {
    conversion_in_progress: bool,
}

impl Status {
    pub async fn read<I: I2c>(address: u8, i2c: &mut I) -> Result<Status, I::Error> {
        let mut buf = [0; 1];
        i2c.write_read(address, &[STATUS], &mut buf).await?;
        Ok(buf[0].into())
    }

    pub fn ready(&self) -> bool {
        !self.conversion_in_progress
    }
}

impl From<u8> for Status {
    fn from(value: u8) -> Self {
        Status {
            conversion_in_progress: (value & STATUS_RDY_MASK) != 0,
        }
    }
}
