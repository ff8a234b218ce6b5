#![macro_use]
#![cfg_attr(not(feature = "std"), no_std)]
//! Field Node is an async, no-alloc sensor node for embedded devices built on
//! [embassy](https://github.com/embassy-rs/embassy) and `embedded-hal` 1.0.
//!
//! The node samples a Si7005 temperature and humidity sensor on a fixed period
//! and sends each reading as a short text message to a gateway over a packet
//! radio. A status LED is lit while a message is in flight. Packets addressed
//! to the node are decoded and logged.
//!
//! # Architecture
//!
//! A single [`Sampler`](actors::sampler::Sampler) owns the sensor, the radio and
//! the LED. Radio notifications arrive on a [`RadioEvents`](traits::radio::RadioEvents)
//! channel and are handled on the same task as the sampling timer, so the two
//! never interleave.
//!
//! # Example
//!
//! ```ignore
//! use field_node::actors::sampler::Sampler;
//! use field_node::config::NodeConfig;
//! use field_node::drivers::{i2c::TimeoutI2c, led::GpioLed, sensors::si7005::Si7005};
//! use field_node::traits::radio::RadioEvents;
//!
//! static EVENTS: RadioEvents = RadioEvents::new();
//!
//! #[embassy_executor::main]
//! async fn main(_spawner: embassy_executor::Spawner) {
//!     let board = Board::init();
//!
//!     // The board's radio driver pushes into EVENTS from its interrupt handler.
//!     let radio = board.radio(EVENTS.sender());
//!     // Reset the bus on the raw data pin, then hand it to the I2C peripheral.
//!     let sensor = Si7005::initialize_with_reset(board.sda, Delay, |sda| {
//!         TimeoutI2c::new(board.i2c(sda))
//!     })
//!     .await
//!     .unwrap();
//!     let led = GpioLed::new(board.led).unwrap();
//!
//!     let mut node = Sampler::new(NodeConfig::default(), sensor, radio, led, EVENTS.receiver());
//!     let cause = node.run().await.unwrap_err();
//!     defmt::panic!("node failed: {}", cause);
//! }
//! ```

pub(crate) mod fmt;

pub mod actors;

pub mod config;

pub mod domain;

pub mod drivers;

pub mod traits;

#[cfg(feature = "std")]
pub mod testutil;
