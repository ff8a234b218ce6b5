//! Driver for the Silicon Labs Si7005 temperature and humidity sensor.
//!
//! A measurement is one uninterrupted sequence on the bus: write the start
//! command to the configuration register, poll the status register until the
//! conversion finishes, then read the two data bytes. The driver owns the bus
//! handle for its lifetime, so `&mut self` keeps measurement cycles from
//! interleaving.

mod register;

use crate::domain::{ReadingKind, SensorReading};
use crate::traits::sensors::EnvironmentSensor;
use core::fmt::{Display, Formatter};
use embassy_time::{Duration, Instant};
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::{Error as _, ErrorKind};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use register::config::Config;
use register::data::RawRegisterPair;
use register::device_id::DeviceId;
use register::status::Status;

pub const ADDR: u8 = 0x40;

/// How long the data line is held low by [`reset_bus`].
pub const RESET_HOLD_MS: u32 = 100;

/// Bus transaction of a measurement or identification.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    Command,
    Status,
    Data,
    Identify,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Stage::Command => "command not accepted",
            Stage::Status => "status read failed",
            Stage::Data => "data read failed",
            Stage::Identify => "identifier read failed",
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    #[error("bus transaction failed: {stage} ({kind:?})")]
    BusTransaction { stage: Stage, kind: ErrorKind },
    #[error("conversion still in progress after {polls} status polls")]
    Timeout { polls: u32 },
    #[error("unexpected device identifier {0:#04x}")]
    UnexpectedIdentity(u8),
}

impl SensorError {
    fn bus<E: embedded_hal::i2c::Error>(stage: Stage) -> impl FnOnce(E) -> SensorError {
        move |e| SensorError::BusTransaction {
            stage,
            kind: e.kind(),
        }
    }
}

/// Bound on the wait for a conversion to finish.
///
/// The wait ends at whichever comes first: [`ConversionWait::max_polls`] status
/// reads, or `timeout_ms` elapsed since polling started. A slow bus therefore
/// shortens the number of polls rather than stretching the wait.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConversionWait {
    pub poll_interval_ms: u32,
    pub timeout_ms: u32,
}

impl ConversionWait {
    pub const fn new(poll_interval_ms: u32, timeout_ms: u32) -> Self {
        Self {
            poll_interval_ms,
            timeout_ms,
        }
    }

    /// Status reads allowed: one immediately, then one per elapsed interval.
    pub fn max_polls(&self) -> u32 {
        (self.timeout_ms / self.poll_interval_ms.max(1)).saturating_add(1)
    }
}

impl Default for ConversionWait {
    /// A normal-mode conversion takes about 35 ms.
    fn default() -> Self {
        Self::new(5, 500)
    }
}

/// Drives the bus data line low for [`RESET_HOLD_MS`] then releases it, forcing
/// any half-finished transfer on the bus back to idle. Run it before handing the
/// pin to the I2C peripheral.
pub async fn reset_bus<P: OutputPin, D: DelayNs>(sda: &mut P, delay: &mut D) -> Result<(), P::Error> {
    sda.set_high()?;
    sda.set_low()?;
    delay.delay_ms(RESET_HOLD_MS).await;
    sda.set_high()
}

pub struct Si7005<I, D> {
    i2c: I,
    delay: D,
    address: u8,
    wait: ConversionWait,
}

impl<I, D> Si7005<I, D>
where
    I: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I, delay: D) -> Self {
        Self {
            i2c,
            delay,
            address: ADDR,
            wait: ConversionWait::default(),
        }
    }

    /// Creates the driver and runs [`Si7005::probe`].
    pub async fn initialize(i2c: I, delay: D) -> Self {
        let mut sensor = Self::new(i2c, delay);
        sensor.probe().await;
        sensor
    }

    /// Runs the full power-up sequence: [`reset_bus`] on the raw data pin, then
    /// `into_bus` to hand the pin over to the I2C peripheral, then
    /// [`Si7005::probe`].
    pub async fn initialize_with_reset<P, F>(
        mut sda: P,
        mut delay: D,
        into_bus: F,
    ) -> Result<Self, P::Error>
    where
        P: OutputPin,
        F: FnOnce(P) -> I,
    {
        reset_bus(&mut sda, &mut delay).await?;
        Ok(Self::initialize(into_bus(sda), delay).await)
    }

    pub fn with_conversion_wait(mut self, wait: ConversionWait) -> Self {
        self.wait = wait;
        self
    }

    /// Wakes the sensor's bus interface with an identifier read. The outcome is
    /// discarded: the first transfer after power-up is commonly not acknowledged.
    /// Use [`Si7005::verify`] to check the sensor is actually there.
    pub async fn probe(&mut self) {
        match DeviceId::read(self.address, &mut self.i2c).await {
            Ok(id) => trace!("si7005 probe answered {}", id.0),
            Err(e) => trace!("si7005 probe not acknowledged: {:?}", e.kind()),
        }
    }

    pub async fn identify(&mut self) -> Result<u8, SensorError> {
        let id = DeviceId::read(self.address, &mut self.i2c)
            .await
            .map_err(SensorError::bus(Stage::Identify))?;
        Ok(id.0)
    }

    /// Fails unless the identifier register reports a Si7005.
    pub async fn verify(&mut self) -> Result<(), SensorError> {
        let id = DeviceId(self.identify().await?);
        if id.is_si7005() {
            Ok(())
        } else {
            Err(SensorError::UnexpectedIdentity(id.0))
        }
    }

    pub async fn measure_temperature(&mut self) -> Result<f32, SensorError> {
        Ok(self.measure(ReadingKind::Temperature).await?.value)
    }

    pub async fn measure_humidity(&mut self) -> Result<f32, SensorError> {
        Ok(self.measure(ReadingKind::Humidity).await?.value)
    }

    pub async fn measure(&mut self, kind: ReadingKind) -> Result<SensorReading, SensorError> {
        Config::start(self.address, &mut self.i2c, kind)
            .await
            .map_err(SensorError::bus(Stage::Command))?;

        self.wait_ready().await?;

        let raw = RawRegisterPair::read(self.address, &mut self.i2c)
            .await
            .map_err(SensorError::bus(Stage::Data))?;

        let reading = SensorReading::new(kind, raw.convert(kind));
        trace!("si7005 {:?} raw {:?}", kind, raw.0);
        Ok(reading)
    }

    async fn wait_ready(&mut self) -> Result<(), SensorError> {
        let max_polls = self.wait.max_polls();
        let deadline = Instant::now() + Duration::from_millis(self.wait.timeout_ms as u64);
        let mut polls = 0;
        loop {
            let status = Status::read(self.address, &mut self.i2c)
                .await
                .map_err(SensorError::bus(Stage::Status))?;
            polls += 1;
            if status.ready() {
                return Ok(());
            }
            if polls >= max_polls || Instant::now() >= deadline {
                return Err(SensorError::Timeout { polls });
            }
            self.delay.delay_ms(self.wait.poll_interval_ms).await;
        }
    }

    /// Gives back the bus and delay handles.
    pub fn release(self) -> (I, D) {
        (self.i2c, self.delay)
    }
}

impl<I, D> EnvironmentSensor for Si7005<I, D>
where
    I: I2c,
    D: DelayNs,
{
    type Error = SensorError;

    async fn temperature(&mut self) -> Result<f32, Self::Error> {
        self.measure_temperature().await
    }

    async fn humidity(&mut self) -> Result<f32, Self::Error> {
        self.measure_humidity().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FakeBus, FakeBusError, FakePin, NoopDelay};
    use embedded_hal::i2c::Error as _;
    use futures::executor::block_on;

    fn sensor(bus: FakeBus) -> Si7005<FakeBus, NoopDelay> {
        Si7005::new(bus, NoopDelay::new())
    }

    #[test]
    fn test_temperature_sequence() {
        let mut si7005 = sensor(FakeBus::new().with_temperature([0x19, 0x40]));
        assert_eq!(0.5, block_on(si7005.measure_temperature()).unwrap());

        let (bus, _) = si7005.release();
        assert_eq!(
            vec![vec![0x03, 0x11], vec![0x00], vec![0x01]],
            bus.writes
        );
        assert_eq!(1, bus.status_reads);
        assert_eq!(1, bus.data_reads);
    }

    #[test]
    fn test_humidity_sequence() {
        let mut si7005 = sensor(FakeBus::new().with_humidity([0x0C, 0x80]));
        assert_eq!(-11.5, block_on(si7005.measure_humidity()).unwrap());

        let (bus, _) = si7005.release();
        assert_eq!(vec![0x03, 0x01], bus.writes[0]);
    }

    #[test]
    fn test_repeated_measurements_are_identical() {
        let mut si7005 = sensor(
            FakeBus::new()
                .with_temperature([0x23, 0xA8])
                .with_humidity([0x47, 0x00])
                .with_busy_polls(2),
        );
        for _ in 0..3 {
            assert_eq!(21.3125, block_on(si7005.measure_temperature()).unwrap());
            assert_eq!(47.0, block_on(si7005.measure_humidity()).unwrap());
        }
    }

    #[test]
    fn test_command_failure_skips_polling() {
        let mut si7005 = sensor(FakeBus::new().failing_on(0x03));
        let err = block_on(si7005.measure_temperature()).unwrap_err();
        assert_eq!(
            SensorError::BusTransaction {
                stage: Stage::Command,
                kind: FakeBusError.kind(),
            },
            err
        );

        let (bus, _) = si7005.release();
        assert_eq!(0, bus.status_reads);
        assert_eq!(0, bus.data_reads);
    }

    #[test]
    fn test_polls_until_ready() {
        for busy in [0, 1, 5] {
            let mut si7005 = sensor(FakeBus::new().with_busy_polls(busy));
            block_on(si7005.measure_temperature()).unwrap();

            let (bus, delay) = si7005.release();
            assert_eq!(busy + 1, bus.status_reads);
            assert_eq!(1, bus.data_reads);
            assert_eq!(busy, delay.calls);
        }
    }

    #[test]
    fn test_stuck_conversion_times_out() {
        let mut si7005 = sensor(FakeBus::new().with_busy_polls(usize::MAX))
            .with_conversion_wait(ConversionWait::new(10, 100));
        let err = block_on(si7005.measure_humidity()).unwrap_err();
        assert_eq!(SensorError::Timeout { polls: 11 }, err);

        let (bus, _) = si7005.release();
        assert_eq!(11, bus.status_reads);
        assert_eq!(0, bus.data_reads);
    }

    #[test]
    fn test_status_failure() {
        let mut si7005 = sensor(FakeBus::new().failing_on(0x00));
        let err = block_on(si7005.measure_temperature()).unwrap_err();
        assert!(matches!(
            err,
            SensorError::BusTransaction {
                stage: Stage::Status,
                ..
            }
        ));
        assert_eq!(
            "bus transaction failed: status read failed (NoAcknowledge(Data))",
            err.to_string()
        );
    }

    #[test]
    fn test_data_failure() {
        let mut si7005 = sensor(FakeBus::new().failing_on(0x01));
        let err = block_on(si7005.measure_humidity()).unwrap_err();
        assert!(matches!(
            err,
            SensorError::BusTransaction {
                stage: Stage::Data,
                ..
            }
        ));
    }

    #[test]
    fn test_verify() {
        let mut si7005 = sensor(FakeBus::new().with_identifier(0x50));
        assert_eq!(Ok(()), block_on(si7005.verify()));

        let mut si7005 = sensor(FakeBus::new().with_identifier(0xFF));
        assert_eq!(
            Err(SensorError::UnexpectedIdentity(0xFF)),
            block_on(si7005.verify())
        );

        let mut si7005 = sensor(FakeBus::new().failing_on(0x11));
        assert!(matches!(
            block_on(si7005.verify()),
            Err(SensorError::BusTransaction {
                stage: Stage::Identify,
                ..
            })
        ));
    }

    #[test]
    fn test_probe_ignores_failure() {
        let si7005 = block_on(Si7005::initialize(
            FakeBus::new().failing_on(0x11),
            NoopDelay::new(),
        ));
        let (bus, _) = si7005.release();
        assert!(bus.writes.is_empty());

        let si7005 = block_on(Si7005::initialize(FakeBus::new(), NoopDelay::new()));
        let (bus, _) = si7005.release();
        assert_eq!(vec![vec![0x11]], bus.writes);
    }

    #[test]
    fn test_slow_bus_ends_wait_by_elapsed_time() {
        let bus = FakeBus::new()
            .with_busy_polls(usize::MAX)
            .with_status_latency(Duration::from_millis(10));
        let mut si7005 = sensor(bus).with_conversion_wait(ConversionWait::new(5, 20));
        let err = block_on(si7005.measure_temperature()).unwrap_err();

        let polls = match err {
            SensorError::Timeout { polls } => polls,
            other => panic!("expected timeout, got {:?}", other),
        };
        assert!(polls < ConversionWait::new(5, 20).max_polls());
        let (bus, _) = si7005.release();
        assert_eq!(polls as usize, bus.status_reads);
    }

    #[test]
    fn test_initialize_with_reset_order() {
        let mut levels_at_handover = Vec::new();
        let si7005 = block_on(Si7005::initialize_with_reset(
            FakePin::new(),
            NoopDelay::new(),
            |sda: FakePin| {
                levels_at_handover = sda.levels().to_vec();
                FakeBus::new()
            },
        ))
        .unwrap();

        assert_eq!(vec![true, false, true], levels_at_handover);
        let (bus, delay) = si7005.release();
        assert_eq!(vec![vec![0x11]], bus.writes);
        assert_eq!(1, delay.calls);
    }

    #[test]
    fn test_reset_bus() {
        let mut sda = FakePin::new();
        let mut delay = NoopDelay::new();
        block_on(reset_bus(&mut sda, &mut delay)).unwrap();
        assert_eq!(&[true, false, true], sda.levels());
        assert_eq!(1, delay.calls);
    }

    #[test]
    fn test_conversion_wait_bounds() {
        assert_eq!(101, ConversionWait::default().max_polls());
        assert_eq!(11, ConversionWait::new(0, 10).max_polls());
        assert_eq!(1, ConversionWait::new(10, 0).max_polls());
        assert_eq!(u32::MAX, ConversionWait::new(1, u32::MAX).max_polls());
        assert_eq!(u32::MAX, ConversionWait::new(0, u32::MAX).max_polls());
    }
}
