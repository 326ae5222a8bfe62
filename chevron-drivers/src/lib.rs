//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in chevron-core, on top of the bus traits from chevron-hal:
//!
//! - Temperature sensors (TMP1075)
//! - Real-time clock (DS3231)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod clock;
pub mod sensor;

#[cfg(test)]
mod testing;

/// Errors from driver operations that are not covered by a core trait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError<E> {
    /// The bus transfer failed
    Bus(E),
    /// The device returned or was given an out-of-range value
    InvalidData,
}

pub use clock::Ds3231;
pub use sensor::Tmp1075;
