//! Board glue between embassy-rp peripherals and chevron-hal traits
//!
//! SKR Pico style wiring:
//! - UART0 on GPIO0 (TX) / GPIO1 (RX): command and telemetry link
//! - I2C0 on GPIO4 (SDA) / GPIO5 (SCL): TMP1075 sensors and DS3231 RTC

use chevron_hal::uart::{DataBits, Parity, StopBits};
use chevron_hal::{I2cBus, I2cConfig, UartConfig, UartTx};
use embassy_rp::{i2c, uart};

/// Convert a link configuration into the embassy-rp UART configuration
pub fn uart_config(config: &UartConfig) -> uart::Config {
    let mut cfg = uart::Config::default();
    cfg.baudrate = config.baudrate;
    cfg.data_bits = match config.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    cfg.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    cfg.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    cfg
}

/// Convert a bus configuration into the embassy-rp I2C configuration
pub fn i2c_config(config: &I2cConfig) -> i2c::Config {
    let mut cfg = i2c::Config::default();
    cfg.frequency = config.frequency;
    cfg
}

/// [`I2cBus`] over any blocking embedded-hal I2C master
pub struct HalI2c<B>(pub B);

impl<B: embedded_hal::i2c::I2c> I2cBus for HalI2c<B> {
    type Error = B::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.0.write(address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.0.read(address, buf)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.0.write_read(address, write_data, read_buf)
    }
}

/// [`UartTx`] over any blocking embedded-io writer
///
/// The buffered UART queues a whole frame without waiting as long as the
/// frame fits in its TX buffer.
pub struct IoTx<W>(pub W);

impl<W: embedded_io::Write> UartTx for IoTx<W> {
    type Error = W::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.0.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.0.flush()
    }
}
