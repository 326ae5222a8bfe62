//! TMP1075 digital temperature sensor
//!
//! The temperature register holds a 12-bit two's complement value,
//! left-justified in 16 bits, at 0.0625 °C per LSB. Several sensors share
//! one bus at different addresses, so a single driver instance serves them
//! all and takes the address per read.

use chevron_core::traits::{SensorError, TemperatureProbe};
use chevron_hal::I2cBus;

use crate::DriverError;

/// Temperature result register
const REG_TEMPERATURE: u8 = 0x00;

/// Degrees Celsius per LSB of the 12-bit result
const CELSIUS_PER_LSB: f32 = 0.0625;

/// TMP1075 sensors on one I2C bus
pub struct Tmp1075<B> {
    bus: B,
}

impl<B: I2cBus> Tmp1075<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Give back the bus
    pub fn release(self) -> B {
        self.bus
    }

    /// Read the raw 12-bit signed result of the sensor at `address`
    pub fn read_raw(&mut self, address: u8) -> Result<i16, DriverError<B::Error>> {
        let mut buf = [0u8; 2];
        self.bus
            .write_read(address, &[REG_TEMPERATURE], &mut buf)
            .map_err(DriverError::Bus)?;
        // Arithmetic shift keeps the sign
        Ok(i16::from_be_bytes(buf) >> 4)
    }

    /// Convert a raw result to degrees Celsius
    pub fn raw_to_celsius(raw: i16) -> f32 {
        f32::from(raw) * CELSIUS_PER_LSB
    }
}

impl<B: I2cBus> TemperatureProbe for Tmp1075<B> {
    fn read_celsius(&mut self, address: u8) -> Result<f32, SensorError> {
        let raw = self.read_raw(address).map_err(|_| SensorError::Bus)?;
        Ok(Self::raw_to_celsius(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBus;
    use proptest::prelude::*;

    #[test]
    fn test_positive_reading() {
        // 0x1500 >> 4 = 0x150 = 336 LSB = 21.0 °C
        let bus = FakeBus::default().with_device(73, 0x00, &[0x15, 0x00]);
        let mut sensor = Tmp1075::new(bus);
        assert_eq!(sensor.read_raw(73), Ok(336));
        assert_eq!(sensor.read_celsius(73), Ok(21.0));
    }

    #[test]
    fn test_negative_reading() {
        // 0xE700 >> 4 = -400 LSB = -25.0 °C
        let bus = FakeBus::default().with_device(72, 0x00, &[0xE7, 0x00]);
        let mut sensor = Tmp1075::new(bus);
        assert_eq!(sensor.read_celsius(72), Ok(-25.0));
    }

    #[test]
    fn test_fraction_and_low_bits_ignored() {
        // 0x19 0x1F: low nibble is not part of the result
        let bus = FakeBus::default().with_device(75, 0x00, &[0x19, 0x1F]);
        let mut sensor = Tmp1075::new(bus);
        assert_eq!(sensor.read_celsius(75), Ok(25.0625));
    }

    #[test]
    fn test_missing_sensor() {
        let bus = FakeBus::default().with_device(73, 0x00, &[0x15, 0x00]);
        let mut sensor = Tmp1075::new(bus);
        assert_eq!(sensor.read_celsius(79), Err(SensorError::Bus));
        assert!(matches!(sensor.read_raw(79), Err(DriverError::Bus(_))));
    }

    #[test]
    fn test_borrowed_bus() {
        let mut bus = FakeBus::default().with_device(73, 0x00, &[0x15, 0x00]);
        {
            let mut sensor = Tmp1075::new(&mut bus);
            assert_eq!(sensor.read_celsius(73), Ok(21.0));
        }
        assert_eq!(bus.transfers, 1);
    }

    proptest! {
        #[test]
        fn prop_conversion_in_range(msb in any::<u8>(), lsb in any::<u8>()) {
            let bus = FakeBus::default().with_device(73, 0x00, &[msb, lsb]);
            let mut sensor = Tmp1075::new(bus);
            let celsius = sensor.read_celsius(73).unwrap();
            prop_assert!((-128.0..128.0).contains(&celsius));
        }
    }
}
