//! DHT Sensor Pulse Decoder for Embedded Rust
//!
//! This crate reads DHT-family humidity sensors (DHT22/AM2302 and friends)
//! over their single-wire, pulse-length encoded protocol.
//!
//! Instead of sampling the line at a fixed point in time, every pulse is
//! measured by counting polls, and each bit is decided by comparing the
//! length of its high phase to the length of its low phase. This keeps the
//! decoder independent of the clock speed of the target.
//!
//! # Features
//! - Blocking synchronous API using `embedded-hal` traits
//! - Designed for `no_std` environments
//! - Rate limiting of repeated reads, with the last result cached
//! - Interrupts suppressed only while pulses are being captured
//! - Optional logging support via `defmt`
//!
//! # Dependencies
//! This driver depends on the following `embedded-hal` traits:
//! - [`InputPin`] and [`OutputPin`] for GPIO access (through [`OpenDrainLine`])
//! - [`DelayNs`] for the start signal timing
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` and enables log output via `defmt`
//! - `critical-section`: Provides `CriticalSectionControl` for masking interrupts
//!
//! [`InputPin`]: embedded_hal::digital::InputPin
//! [`OutputPin`]: embedded_hal::digital::OutputPin
//! [`DelayNs`]: embedded_hal::delay::DelayNs

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod config;
pub mod dht;
pub mod error;
pub mod frame;
pub mod hal;
pub mod interrupt;
pub mod pulse;

pub use config::Config;
pub use dht::Dht;
pub use error::DhtError;
pub use frame::Frame;
pub use hal::{Clock, DataLine, OpenDrainLine};
#[cfg(feature = "critical-section")]
pub use interrupt::CriticalSectionControl;
pub use interrupt::{InterruptControl, InterruptFree, NoInterruptControl};
