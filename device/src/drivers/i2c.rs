//! Bus-level guard bounding every I2C transaction by a timeout.

use crate::config::BUS_TRANSACTION_TIMEOUT;
use embassy_time::{with_timeout, Duration};
use embedded_hal::i2c::{Error, ErrorKind};
use embedded_hal_async::i2c::{ErrorType, I2c, Operation, SevenBitAddress};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BusError<E> {
    Bus(E),
    Timeout,
}

impl<E: Error> Error for BusError<E> {
    fn kind(&self) -> ErrorKind {
        match self {
            BusError::Bus(e) => e.kind(),
            BusError::Timeout => ErrorKind::Other,
        }
    }
}

/// Wraps an I2C bus so no transaction outlives `timeout`. A transaction that
/// overruns is dropped and reported as [`BusError::Timeout`].
pub struct TimeoutI2c<I> {
    inner: I,
    timeout: Duration,
}

impl<I> TimeoutI2c<I> {
    /// Guards `inner` with the default 1000 ms transaction timeout.
    pub fn new(inner: I) -> Self {
        Self::with_timeout(inner, BUS_TRANSACTION_TIMEOUT)
    }

    pub fn with_timeout(inner: I, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn release(self) -> I {
        self.inner
    }
}

impl<I: I2c> ErrorType for TimeoutI2c<I> {
    type Error = BusError<I::Error>;
}

impl<I: I2c> I2c<SevenBitAddress> for TimeoutI2c<I> {
    async fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        match with_timeout(self.timeout, self.inner.transaction(address, operations)).await {
            Ok(result) => result.map_err(BusError::Bus),
            Err(_) => {
                warn!(
                    "i2c transaction to address {} timed out after {} ms",
                    address,
                    self.timeout.as_millis()
                );
                Err(BusError::Timeout)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FakeBus, FakeBusError};
    use futures::executor::block_on;

    #[test]
    fn test_passes_through() {
        let bus = FakeBus::new().with_identifier(0x50);
        let mut i2c = TimeoutI2c::new(bus);
        let mut buf = [0; 1];
        block_on(i2c.write_read(0x40, &[0x11], &mut buf)).unwrap();
        assert_eq!(0x50, buf[0]);
    }

    #[test]
    fn test_bus_error_keeps_kind() {
        let bus = FakeBus::new().failing_on(0x11);
        let mut i2c = TimeoutI2c::new(bus);
        let mut buf = [0; 1];
        let err = block_on(i2c.write_read(0x40, &[0x11], &mut buf)).unwrap_err();
        assert_eq!(BusError::Bus(FakeBusError), err);
        assert_eq!(FakeBusError.kind(), err.kind());
    }

    #[test]
    fn test_hung_transaction_times_out() {
        let bus = FakeBus::new().hanging();
        let mut i2c = TimeoutI2c::with_timeout(bus, Duration::from_millis(5));
        let err = block_on(i2c.write(0x40, &[0x03, 0x11])).unwrap_err();
        assert_eq!(BusError::Timeout, err);
        assert_eq!(ErrorKind::Other, err.kind());
    }
}
