//! Outbound timestamp frames
//!
//! Frame format (always 16 bytes):
//! ```text
//! D:HHMMSS_DDMMYY;
//! ```
//!
//! Every field is two zero-padded digits. The year is the two-digit year
//! of the century, as kept by the RTC.

use core::fmt::Write;

use heapless::String;

/// Length of a timestamp frame
pub const TIMESTAMP_LEN: usize = 16;

/// Wall-clock reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateTime {
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
    /// 0-59
    pub second: u8,
    /// Day of month, 1-31
    pub day: u8,
    /// 1-12
    pub month: u8,
    /// Year of the century, 0-99
    pub year: u8,
}

impl DateTime {
    /// True if every field is in its calendar range
    pub fn is_valid(&self) -> bool {
        self.hour < 24
            && self.minute < 60
            && self.second < 60
            && (1..=31).contains(&self.day)
            && (1..=12).contains(&self.month)
            && self.year < 100
    }
}

/// Encoded `D:HHMMSS_DDMMYY;` frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampFrame {
    text: String<TIMESTAMP_LEN>,
}

impl TimestampFrame {
    /// Encode a wall-clock reading
    ///
    /// Fields are reduced modulo 100 so the frame width never changes.
    pub fn encode(time: &DateTime) -> Self {
        let mut text = String::new();
        // Six two-digit fields plus framing is exactly TIMESTAMP_LEN
        let _ = write!(
            text,
            "D:{:02}{:02}{:02}_{:02}{:02}{:02};",
            time.hour % 100,
            time.minute % 100,
            time.second % 100,
            time.day % 100,
            time.month % 100,
            time.year % 100,
        );
        Self { text }
    }

    /// Frame text
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Frame bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TimestampFrame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_timestamp() {
        let time = DateTime {
            hour: 9,
            minute: 5,
            second: 7,
            day: 3,
            month: 11,
            year: 24,
        };
        let frame = TimestampFrame::encode(&time);
        assert_eq!(frame.as_str(), "D:090507_031124;");
        assert_eq!(frame.as_bytes().len(), TIMESTAMP_LEN);
    }

    #[test]
    fn test_out_of_range_fields_keep_width() {
        let time = DateTime {
            hour: 255,
            minute: 0,
            second: 0,
            day: 1,
            month: 1,
            year: 125,
        };
        assert!(!time.is_valid());
        let frame = TimestampFrame::encode(&time);
        assert_eq!(frame.as_str(), "D:550000_010125;");
        assert_eq!(frame.as_bytes().len(), TIMESTAMP_LEN);
    }

    #[test]
    fn test_validity() {
        let mut time = DateTime {
            hour: 23,
            minute: 59,
            second: 59,
            day: 31,
            month: 12,
            year: 99,
        };
        assert!(time.is_valid());
        time.day = 0;
        assert!(!time.is_valid());
        assert!(!DateTime::default().is_valid());
    }
}
