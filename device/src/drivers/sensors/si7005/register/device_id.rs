use embedded_hal_async::i2c::*;

const ID: u8 = 0x11;

// upper nibble of the ID register on a Si7005
const SI7005_ID: u8 = 0x5;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DeviceId(pub u8);

impl DeviceId {
    pub async fn read<I: I2c>(address: u8, i2c: &mut I) -> Result<DeviceId, I::Error> {
        let mut buf = [0; 1];
        i2c.write_read(address, &[ID], &mut buf).await?;
        Ok(DeviceId(buf[0]))
    }

    pub fn is_si7005(&self) -> bool {
        self.0 >> 4 == SI7005_ID
    }
}
