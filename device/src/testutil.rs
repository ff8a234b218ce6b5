//! In-memory stand-ins for the node's hardware, used by the unit and
//! integration tests.
extern crate std;

use crate::drivers::sensors::si7005::ADDR;
use crate::traits::led::Led;
use crate::traits::radio::{DeviceAddress, Radio, RadioConfig};
use core::convert::Infallible;
use embassy_time::{Duration, Timer};
use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::i2c::{Error, ErrorKind, NoAcknowledgeSource};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{ErrorType, I2c, Operation, SevenBitAddress};
use std::vec::Vec;

const STATUS: u8 = 0x00;
const DATA: u8 = 0x01;
const CONFIG: u8 = 0x03;
const ID: u8 = 0x11;
const START_TEMPERATURE: u8 = 0x11;

/// A Si7005 on a simulated bus.
///
/// Every accepted write is recorded in `writes`. A write selecting the
/// register given to [`FakeBus::failing_on`] is refused and not recorded.
pub struct FakeBus {
    temperature: [u8; 2],
    humidity: [u8; 2],
    identifier: u8,
    busy_polls: usize,
    busy_remaining: usize,
    fail_register: Option<u8>,
    hang: bool,
    status_latency: Option<Duration>,
    selected: u8,
    command: u8,
    pub writes: Vec<Vec<u8>>,
    pub status_reads: usize,
    pub data_reads: usize,
}

impl FakeBus {
    pub fn new() -> Self {
        Self {
            temperature: [0; 2],
            humidity: [0; 2],
            identifier: 0x50,
            busy_polls: 0,
            busy_remaining: 0,
            fail_register: None,
            hang: false,
            status_latency: None,
            selected: 0,
            command: 0,
            writes: Vec::new(),
            status_reads: 0,
            data_reads: 0,
        }
    }

    pub fn with_temperature(mut self, raw: [u8; 2]) -> Self {
        self.temperature = raw;
        self
    }

    pub fn with_humidity(mut self, raw: [u8; 2]) -> Self {
        self.humidity = raw;
        self
    }

    pub fn with_identifier(mut self, identifier: u8) -> Self {
        self.identifier = identifier;
        self
    }

    /// Status reads reporting busy after each start command.
    pub fn with_busy_polls(mut self, polls: usize) -> Self {
        self.busy_polls = polls;
        self
    }

    pub fn failing_on(mut self, register: u8) -> Self {
        self.fail_register = Some(register);
        self
    }

    /// Transactions never complete.
    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    /// Each status read takes `latency` to complete.
    pub fn with_status_latency(mut self, latency: Duration) -> Self {
        self.status_latency = Some(latency);
        self
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), FakeBusError> {
        let register = bytes.first().copied().unwrap_or_default();
        if self.fail_register == Some(register) {
            return Err(FakeBusError);
        }
        self.writes.push(bytes.to_vec());
        self.selected = register;
        if register == CONFIG {
            self.command = bytes.get(1).copied().unwrap_or_default();
            self.busy_remaining = self.busy_polls;
        }
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) {
        match self.selected {
            STATUS => {
                self.status_reads += 1;
                let busy = if self.busy_remaining > 0 {
                    self.busy_remaining -= 1;
                    0x01
                } else {
                    0x00
                };
                buf.fill(busy);
            }
            DATA => {
                self.data_reads += 1;
                let raw = if self.command == START_TEMPERATURE {
                    self.temperature
                } else {
                    self.humidity
                };
                for (b, r) in buf.iter_mut().zip(raw.iter()) {
                    *b = *r;
                }
            }
            ID => buf.fill(self.identifier),
            _ => buf.fill(0),
        }
    }
}

impl Default for FakeBus {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FakeBusError;

impl Error for FakeBusError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)
    }
}

impl ErrorType for FakeBus {
    type Error = FakeBusError;
}

impl I2c<SevenBitAddress> for FakeBus {
    async fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.hang {
            core::future::pending::<()>().await;
        }
        assert_eq!(ADDR, address);
        for operation in operations {
            match operation {
                Operation::Write(bytes) => self.write(bytes)?,
                Operation::Read(buf) => {
                    if let (STATUS, Some(latency)) = (self.selected, self.status_latency) {
                        Timer::after(latency).await;
                    }
                    self.read(buf)
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FakeRadioError;

/// Records what the node asks of its radio.
#[derive(Default)]
pub struct FakeRadio {
    pub config: Option<RadioConfig>,
    pub listening: Option<DeviceAddress>,
    /// `(destination, payload)` of every accepted send.
    pub sent: Vec<(Vec<u8>, Vec<u8>)>,
    pub fail_send: bool,
    pub fail_initialise: bool,
}

impl FakeRadio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    pub fn failing_initialise(mut self) -> Self {
        self.fail_initialise = true;
        self
    }

    /// Payloads sent so far, as text.
    pub fn sent_text(&self) -> Vec<&str> {
        self.sent
            .iter()
            .map(|(_, payload)| core::str::from_utf8(payload).unwrap_or("<binary>"))
            .collect()
    }
}

impl Radio for FakeRadio {
    type Error = FakeRadioError;

    async fn initialise(&mut self, config: &RadioConfig) -> Result<(), Self::Error> {
        if self.fail_initialise {
            return Err(FakeRadioError);
        }
        self.config = Some(*config);
        Ok(())
    }

    async fn receive(&mut self, address: &DeviceAddress) -> Result<(), Self::Error> {
        self.listening = Some(*address);
        Ok(())
    }

    async fn send(&mut self, destination: &DeviceAddress, payload: &[u8]) -> Result<(), Self::Error> {
        if self.fail_send {
            return Err(FakeRadioError);
        }
        self.sent
            .push((destination.as_bytes().to_vec(), payload.to_vec()));
        Ok(())
    }
}

/// Records every on/off request.
#[derive(Default)]
pub struct FakeLed {
    pub history: Vec<bool>,
}

impl FakeLed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_on(&self) -> bool {
        self.history.last().copied().unwrap_or(false)
    }
}

impl Led for FakeLed {
    type Error = Infallible;

    fn on(&mut self) -> Result<(), Self::Error> {
        self.history.push(true);
        Ok(())
    }

    fn off(&mut self) -> Result<(), Self::Error> {
        self.history.push(false);
        Ok(())
    }

    fn state(&self) -> Result<bool, Self::Error> {
        Ok(self.is_on())
    }
}

/// An output pin remembering each level it was driven to.
#[derive(Default)]
pub struct FakePin {
    levels: Vec<bool>,
}

impl FakePin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn levels(&self) -> &[bool] {
        &self.levels
    }
}

impl PinErrorType for FakePin {
    type Error = Infallible;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.push(true);
        Ok(())
    }
}

/// Returns immediately, counting requested delays.
#[derive(Default)]
pub struct NoopDelay {
    pub calls: usize,
}

impl NoopDelay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DelayNs for NoopDelay {
    async fn delay_ns(&mut self, _ns: u32) {
        self.calls += 1;
    }

    async fn delay_us(&mut self, _us: u32) {
        self.calls += 1;
    }

    async fn delay_ms(&mut self, _ms: u32) {
        self.calls += 1;
    }
}
