//! DS3231 real-time clock
//!
//! Time is kept in BCD registers 0x00-0x06. The hour register may be in
//! 12-hour mode; readings are always converted to 24-hour time. The
//! oscillator-stop flag in the status register marks a clock that lost
//! power and must be set before its time can be trusted.

use chevron_core::traits::{ClockError, DateTime, WallClock};
use chevron_hal::I2cBus;

use crate::DriverError;

/// Fixed bus address
pub const DS3231_ADDRESS: u8 = 0x68;

const REG_SECONDS: u8 = 0x00;
const REG_STATUS: u8 = 0x0F;

/// Registers read in one transfer, seconds through status
const SNAPSHOT_LEN: usize = REG_STATUS as usize + 1;

const HOUR_12H: u8 = 1 << 6;
const HOUR_PM: u8 = 1 << 5;
const MONTH_CENTURY: u8 = 1 << 7;
const STATUS_OSF: u8 = 1 << 7;

fn bcd_to_bin(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0F)
}

fn bin_to_bcd(bin: u8) -> u8 {
    ((bin / 10) << 4) | (bin % 10)
}

fn decode_hour(reg: u8) -> u8 {
    if reg & HOUR_12H == 0 {
        return bcd_to_bin(reg & 0x3F);
    }
    let hour = bcd_to_bin(reg & 0x1F) % 12;
    if reg & HOUR_PM != 0 {
        hour + 12
    } else {
        hour
    }
}

/// DS3231 on an I2C bus
pub struct Ds3231<B> {
    bus: B,
}

impl<B: I2cBus> Ds3231<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Give back the bus
    pub fn release(self) -> B {
        self.bus
    }

    /// Read and decode the time registers
    pub fn read_time(&mut self) -> Result<DateTime, ClockError> {
        let mut regs = [0u8; SNAPSHOT_LEN];
        self.bus
            .write_read(DS3231_ADDRESS, &[REG_SECONDS], &mut regs)
            .map_err(|_| ClockError::Bus)?;

        if regs[REG_STATUS as usize] & STATUS_OSF != 0 {
            return Err(ClockError::Stopped);
        }

        let time = DateTime {
            second: bcd_to_bin(regs[0] & 0x7F),
            minute: bcd_to_bin(regs[1] & 0x7F),
            hour: decode_hour(regs[2]),
            day: bcd_to_bin(regs[4] & 0x3F),
            month: bcd_to_bin(regs[5] & 0x1F),
            year: bcd_to_bin(regs[6]),
        };

        if time.is_valid() {
            Ok(time)
        } else {
            Err(ClockError::InvalidTime)
        }
    }

    /// Set the clock (24-hour mode) and clear the oscillator-stop flag
    pub fn set_time(&mut self, time: &DateTime) -> Result<(), DriverError<B::Error>> {
        if !time.is_valid() {
            return Err(DriverError::InvalidData);
        }

        // Day of week is not tracked; the chip only needs it in range
        let frame = [
            REG_SECONDS,
            bin_to_bcd(time.second),
            bin_to_bcd(time.minute),
            bin_to_bcd(time.hour),
            1,
            bin_to_bcd(time.day),
            bin_to_bcd(time.month) & !MONTH_CENTURY,
            bin_to_bcd(time.year),
        ];
        self.bus
            .write(DS3231_ADDRESS, &frame)
            .map_err(DriverError::Bus)?;

        let mut status = [0u8; 1];
        self.bus
            .write_read(DS3231_ADDRESS, &[REG_STATUS], &mut status)
            .map_err(DriverError::Bus)?;
        self.bus
            .write(DS3231_ADDRESS, &[REG_STATUS, status[0] & !STATUS_OSF])
            .map_err(DriverError::Bus)
    }
}

impl<B: I2cBus> WallClock for Ds3231<B> {
    fn now(&mut self) -> Result<DateTime, ClockError> {
        self.read_time()
    }
}
