//! Wall-clock time source

pub use chevron_protocol::DateTime;

/// Errors that can occur while reading the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// The bus transfer failed
    Bus,
    /// The clock returned a value outside the calendar range
    InvalidTime,
    /// The oscillator stopped; the time is not trustworthy
    Stopped,
}

/// Source of calendar time
pub trait WallClock {
    /// Current date and time
    fn now(&mut self) -> Result<DateTime, ClockError>;
}

impl<T: WallClock + ?Sized> WallClock for &mut T {
    fn now(&mut self) -> Result<DateTime, ClockError> {
        T::now(self)
    }
}
