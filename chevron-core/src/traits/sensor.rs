//! Temperature sensing

/// Errors that can occur while reading a temperature sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// The bus transfer failed or no sensor answered at the address
    Bus,
}

/// A set of temperature sensors addressed by their bus address
///
/// One implementation usually serves every sensor on a shared bus, which is
/// why the address is a parameter rather than part of the sensor.
pub trait TemperatureProbe {
    /// Read one sensor in degrees Celsius
    ///
    /// Takes `&mut self` because bus transfers require mutable access.
    fn read_celsius(&mut self, address: u8) -> Result<f32, SensorError>;
}

impl<T: TemperatureProbe + ?Sized> TemperatureProbe for &mut T {
    fn read_celsius(&mut self, address: u8) -> Result<f32, SensorError> {
        T::read_celsius(self, address)
    }
}
