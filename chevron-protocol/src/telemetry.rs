//! Outbound sensor frames
//!
//! Frame format:
//! ```text
//! {"temp_system":21.3,"temp_drivers":19.8,"80":25.0}
//! ```
//!
//! Keys come from a fixed address table; unknown addresses are sent as
//! their decimal value. Values use a fixed minimum width and precision.
//! The frame holds at most [`MAX_TELEMETRY_LEN`] bytes. Entries that would
//! not fit (keeping one byte for the closing brace) are dropped whole, so a
//! truncated frame is still a valid object.

use core::fmt::{self, Write};

use heapless::String;

use crate::line::write_terminated;

/// Maximum payload length of a sensor frame
pub const MAX_TELEMETRY_LEN: usize = 255;

/// Longest single `"key":value,` entry that is ever attempted
///
/// Only magnitudes far outside any sensor range (around 1e30 and up)
/// produce longer text; such readings are dropped.
const MAX_ENTRY_LEN: usize = 48;

/// One reading taken from a sensor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorReading {
    /// 7-bit bus address of the sensor
    pub address: u8,
    /// Reading in degrees Celsius
    pub value: f32,
}

impl SensorReading {
    pub const fn new(address: u8, value: f32) -> Self {
        Self { address, value }
    }
}

/// Well-known sensor addresses
pub mod address {
    pub const DRIVERS: u8 = 72;
    pub const SYSTEM: u8 = 73;
    pub const MOTOR_X: u8 = 75;
    pub const MOTOR_Y: u8 = 79;
}

/// JSON key under which a sensor is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorKey {
    /// Mnemonic name for a known address
    Named(&'static str),
    /// Decimal address for anything else
    Address(u8),
}

impl SensorKey {
    /// Look up the key for a sensor address
    pub const fn for_address(addr: u8) -> Self {
        match addr {
            address::SYSTEM => SensorKey::Named("temp_system"),
            address::DRIVERS => SensorKey::Named("temp_drivers"),
            address::MOTOR_X => SensorKey::Named("temp_motor_x"),
            address::MOTOR_Y => SensorKey::Named("temp_motor_y"),
            other => SensorKey::Address(other),
        }
    }
}

impl fmt::Display for SensorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKey::Named(name) => f.write_str(name),
            SensorKey::Address(addr) => write!(f, "{}", addr),
        }
    }
}

/// Width and precision used for sensor values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ValueFormat {
    /// Minimum field width (space padded)
    pub width: u8,
    /// Digits after the decimal point
    pub precision: u8,
}

impl ValueFormat {
    /// Largest accepted width, keeps any entry below `MAX_ENTRY_LEN`
    pub const MAX_WIDTH: u8 = 12;
    /// Largest accepted precision
    pub const MAX_PRECISION: u8 = 6;

    /// Build a format, clamping to the supported range
    pub const fn new(width: u8, precision: u8) -> Self {
        Self {
            width: if width > Self::MAX_WIDTH {
                Self::MAX_WIDTH
            } else {
                width
            },
            precision: if precision > Self::MAX_PRECISION {
                Self::MAX_PRECISION
            } else {
                precision
            },
        }
    }
}

impl Default for ValueFormat {
    fn default() -> Self {
        Self::new(3, 1)
    }
}

/// A sensor frame under construction or ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryFrame {
    text: String<MAX_TELEMETRY_LEN>,
    dropped: usize,
}

impl TelemetryFrame {
    /// Encode a complete frame from readings
    pub fn encode<I>(readings: I, format: ValueFormat) -> Self
    where
        I: IntoIterator<Item = SensorReading>,
    {
        let mut builder = FrameBuilder::new(format);
        for reading in readings {
            builder.push(reading);
        }
        builder.finish()
    }

    /// Frame text
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Frame bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// Payload length
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Always false: even an empty frame carries `{}`
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of readings left out because the frame was full
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Copy into a caller buffer with a NUL terminator, truncating if needed
    ///
    /// Returns the number of payload bytes written.
    pub fn write_terminated(&self, out: &mut [u8]) -> usize {
        write_terminated(self.as_bytes(), out)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TelemetryFrame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}

/// Incremental sensor frame encoder
///
/// Lets a caller interleave sensor reads with encoding without collecting
/// the readings first.
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    text: String<MAX_TELEMETRY_LEN>,
    format: ValueFormat,
    entries: usize,
    dropped: usize,
}

impl FrameBuilder {
    /// Start a new frame
    pub fn new(format: ValueFormat) -> Self {
        let mut text = String::new();
        // Cannot fail on an empty buffer
        let _ = text.push('{');
        Self {
            text,
            format,
            entries: 0,
            dropped: 0,
        }
    }

    /// Number of entries appended so far
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Append one reading
    ///
    /// Returns false if the reading was dropped. That happens when the value
    /// is not finite, when its text is longer than an entry may be, or
    /// when the entry does not fit in the frame.
    pub fn push(&mut self, reading: SensorReading) -> bool {
        if !reading.value.is_finite() {
            self.dropped += 1;
            return false;
        }

        let mut entry: String<MAX_ENTRY_LEN> = String::new();
        let written = write!(
            entry,
            "\"{}\":{:>width$.prec$},",
            SensorKey::for_address(reading.address),
            reading.value,
            width = self.format.width as usize,
            prec = self.format.precision as usize,
        );

        // One byte stays reserved for the closing brace
        let fits = written.is_ok() && self.text.len() + entry.len() < MAX_TELEMETRY_LEN;
        if fits && self.text.push_str(&entry).is_ok() {
            self.entries += 1;
            true
        } else {
            self.dropped += 1;
            false
        }
    }

    /// Close the object
    pub fn finish(mut self) -> TelemetryFrame {
        if self.text.ends_with(',') {
            self.text.pop();
        }
        // Room for this byte is reserved by `push`
        let _ = self.text.push('}');
        TelemetryFrame {
            text: self.text,
            dropped: self.dropped,
        }
    }
}
