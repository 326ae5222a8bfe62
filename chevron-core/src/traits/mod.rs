//! Hardware abstraction traits
//!
//! These traits define the interface between the protocol logic and the
//! hardware collaborators that feed it. Byte and bus level traits live in
//! `chevron-hal`; delays use `embedded_hal_async::delay::DelayNs`.

pub mod clock;
pub mod sensor;

pub use clock::{ClockError, DateTime, WallClock};
pub use sensor::{SensorError, TemperatureProbe};
