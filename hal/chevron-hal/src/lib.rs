//! Chevron Hardware Abstraction Layer
//!
//! Bus-level traits implemented by the board support code in the firmware
//! and by fakes in host tests. Everything above this crate (sensor and RTC
//! drivers, the telemetry reporter) is written against these traits only.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  chevron-firmware (RP2040 board glue)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  chevron-core / chevron-drivers         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  chevron-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`] - Serial transmit
//! - [`i2c::I2cBus`] - I2C bus operations

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use i2c::{I2cBus, I2cConfig};
pub use uart::{UartConfig, UartTx};
