//! The sampling and dispatch loop.
//!
//! A [`Sampler`] owns the sensor, the radio and the status indicator. Its
//! [`Sampler::run`] loop waits on the sampling timer and on the radio's event
//! queue at the same time, and handles whichever fires first, so timer work and
//! radio notifications never run concurrently.
//!
//! On each tick it measures temperature then humidity, logs them and sends a
//! [`Message`] to the gateway. Only one message is ever in flight: ticks that
//! arrive before the radio reports the previous transmission complete are
//! skipped, until the transmit timeout declares that message lost.

pub mod inbound;
pub mod message;

use crate::config::NodeConfig;
use crate::domain::{Decimal, SensorAcquisition, Uptime};
use crate::fmt::render;
use crate::traits::led::Led;
use crate::traits::radio::{Packet, Radio, RadioEvent, RadioEventReceiver};
use crate::traits::sensors::EnvironmentSensor;
use core::convert::Infallible;
use core::fmt::{Debug, Display, Formatter};
use embassy_futures::select::{select, Either};
use embassy_time::{Instant, Timer};
pub use inbound::DecodeError;
pub use message::Message;

/// Cause of the sampling loop stopping.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeError<S, R> {
    Sensor(S),
    Radio(R),
}

impl<S: Display, R: Debug> Display for NodeError<S, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            NodeError::Sensor(e) => write!(f, "sensor failure: {}", e),
            NodeError::Radio(e) => write!(f, "radio failure: {:?}", e),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeState<E> {
    /// Nothing in flight; the next tick samples.
    Idle,
    /// A message was handed to the radio at `since` and is not yet confirmed.
    Transmitting { since: Instant },
    /// Terminal: sampling stopped for the contained cause.
    Failed(E),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub cycles: u32,
    pub skipped: u32,
    pub sent: u32,
    pub send_failures: u32,
    pub lost: u32,
    pub received: u32,
    pub decode_errors: u32,
}

/// Counters wrap on overflow.
fn bump(counter: &mut u32) {
    *counter = counter.wrapping_add(1);
}

pub struct Sampler<'a, S, R, L>
where
    S: EnvironmentSensor,
    R: Radio,
    L: Led,
{
    config: NodeConfig,
    sensor: S,
    radio: R,
    indicator: L,
    events: RadioEventReceiver<'a>,
    state: NodeState<NodeError<S::Error, R::Error>>,
    statistics: Statistics,
}

impl<'a, S, R, L> Sampler<'a, S, R, L>
where
    S: EnvironmentSensor,
    S::Error: Display + Clone,
    R: Radio,
    R::Error: Clone,
    L: Led,
    L::Error: Debug,
{
    pub fn new(
        config: NodeConfig,
        sensor: S,
        radio: R,
        indicator: L,
        events: RadioEventReceiver<'a>,
    ) -> Self {
        Self {
            config,
            sensor,
            radio,
            indicator,
            events,
            state: NodeState::Idle,
            statistics: Statistics::default(),
        }
    }

    pub fn state(&self) -> &NodeState<NodeError<S::Error, R::Error>> {
        &self.state
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }

    pub fn indicator(&self) -> &L {
        &self.indicator
    }

    /// Runs until sampling fails. The node has no other way to stop, so this
    /// only returns with the cause, after moving to [`NodeState::Failed`].
    pub async fn run(&mut self) -> Result<Infallible, NodeError<S::Error, R::Error>> {
        match self.serve().await {
            Ok(never) => match never {},
            Err(e) => {
                error!("sampling halted: {}", render(format_args!("{}", e)).as_str());
                self.state = NodeState::Failed(e.clone());
                Err(e)
            }
        }
    }

    async fn serve(&mut self) -> Result<Infallible, NodeError<S::Error, R::Error>> {
        self.start().await?;

        let mut next = Instant::now() + self.config.initial_delay;
        loop {
            match select(Timer::at(next), self.events.receive()).await {
                Either::First(_) => {
                    next += self.config.period;
                    self.on_tick().await?;
                }
                Either::Second(event) => self.on_event(event),
            }
        }
    }

    /// Clears the indicator and puts the radio in receive mode at the node's
    /// address.
    pub async fn start(&mut self) -> Result<(), NodeError<S::Error, R::Error>> {
        self.indicator_off();
        self.radio
            .initialise(&self.config.radio)
            .await
            .map_err(NodeError::Radio)?;
        self.radio
            .receive(&self.config.address)
            .await
            .map_err(NodeError::Radio)?;
        info!(
            "listening as {} on {} Hz",
            render(format_args!("{}", self.config.address)).as_str(),
            self.config.radio.frequency_hz
        );
        Ok(())
    }

    /// One sampling cycle. Measurement failures are returned to the caller;
    /// everything else is logged and absorbed.
    pub async fn on_tick(&mut self) -> Result<(), NodeError<S::Error, R::Error>> {
        if let NodeState::Transmitting { since } = self.state {
            let elapsed = since.elapsed();
            if elapsed < self.config.transmit_timeout {
                warn!(
                    "previous message in flight for {} ms, skipping cycle",
                    elapsed.as_millis()
                );
                bump(&mut self.statistics.skipped);
                return Ok(());
            }
            warn!(
                "no transmit-complete after {} ms, message lost",
                elapsed.as_millis()
            );
            bump(&mut self.statistics.lost);
            self.state = NodeState::Idle;
        }

        bump(&mut self.statistics.cycles);
        self.indicator_on();

        let temperature = self.sensor.temperature().await.map_err(NodeError::Sensor)?;
        let relative_humidity = self.sensor.humidity().await.map_err(NodeError::Sensor)?;
        let acquisition = SensorAcquisition {
            temperature,
            relative_humidity,
        };

        info!(
            "{}",
            render(format_args!(
                "{} T:{} H:{}",
                Uptime::now(),
                Decimal::new(acquisition.temperature, 1),
                Decimal::new(acquisition.relative_humidity, 1)
            ))
            .as_str()
        );

        let message = Message::new(&acquisition);
        if let Err(e) = self
            .radio
            .send(&self.config.gateway, message.as_bytes())
            .await
        {
            warn!(
                "send of \"{}\" failed: {}",
                message.as_str(),
                render(format_args!("{:?}", e)).as_str()
            );
            bump(&mut self.statistics.send_failures);
            self.indicator_off();
            return Ok(());
        }
        debug!("sent \"{}\"", message.as_str());
        bump(&mut self.statistics.sent);
        self.state = NodeState::Transmitting {
            since: Instant::now(),
        };

        self.indicator_on();
        Ok(())
    }

    pub fn on_event(&mut self, event: RadioEvent) {
        match event {
            RadioEvent::TransmitComplete => self.on_transmit_complete(),
            RadioEvent::DataReceived(packet) => self.on_data_received(&packet),
        }
    }

    fn on_transmit_complete(&mut self) {
        info!("Transmit-Done");
        match self.state {
            NodeState::Transmitting { .. } => self.state = NodeState::Idle,
            _ => debug!("transmit-complete with no message in flight"),
        }
        self.indicator_off();
    }

    fn on_data_received(&mut self, packet: &Packet) {
        bump(&mut self.statistics.received);
        match inbound::describe(packet, Uptime::now()) {
            Ok(line) => info!("{}", line.as_str()),
            Err(e) => {
                bump(&mut self.statistics.decode_errors);
                warn!("{}", render(format_args!("{}", e)).as_str());
            }
        }
    }

    fn indicator_on(&mut self) {
        if let Err(e) = self.indicator.on() {
            warn!(
                "indicator on failed: {}",
                render(format_args!("{:?}", e)).as_str()
            );
        }
    }

    fn indicator_off(&mut self) {
        if let Err(e) = self.indicator.off() {
            warn!(
                "indicator off failed: {}",
                render(format_args!("{:?}", e)).as_str()
            );
        }
    }
}
