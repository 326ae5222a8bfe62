//! Configuration type definitions

use chevron_protocol::{telemetry::address, DEFAULT_DELIMITER};
use heapless::Vec;

/// Maximum number of sensors in one telemetry frame
pub const MAX_SENSORS: usize = 8;

/// Serial link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialConfig {
    /// Baud rate of the command/telemetry UART
    pub baudrate: u32,
    /// Byte that closes a received line
    pub delimiter: u8,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baudrate: 115_200,
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

/// Temperature telemetry settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryConfig {
    /// Period between frames
    pub interval_ms: u32,
    /// Wait between two sensor readings
    pub settle_ms: u32,
    /// Minimum value field width
    pub width: u8,
    /// Digits after the decimal point
    pub precision: u8,
    /// Sensor addresses, in reporting order
    pub sensors: Vec<u8, MAX_SENSORS>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        let mut sensors = Vec::new();
        for addr in [
            address::SYSTEM,
            address::DRIVERS,
            address::MOTOR_X,
            address::MOTOR_Y,
        ] {
            // Four entries always fit in MAX_SENSORS
            let _ = sensors.push(addr);
        }
        Self {
            interval_ms: 1000,
            settle_ms: 10,
            width: 3,
            precision: 1,
            sensors,
        }
    }
}

/// Timestamp frame settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimestampConfig {
    /// Period between frames, 0 disables them
    pub interval_ms: u32,
}

impl TimestampConfig {
    pub fn enabled(&self) -> bool {
        self.interval_ms > 0
    }
}

impl Default for TimestampConfig {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

/// Remote state monitor settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorConfig {
    /// Poll period of the shared remote state
    pub interval_ms: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self { interval_ms: 100 }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    pub serial: SerialConfig,
    pub telemetry: TelemetryConfig,
    pub timestamp: TimestampConfig,
    pub monitor: MonitorConfig,
}
