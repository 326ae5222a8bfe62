//! Minimal TOML parser for device configuration
//!
//! Handles only the subset the device configuration needs and never
//! allocates. It is NOT a general TOML parser.
//!
//! Supported features:
//! - [section] headers
//! - Key = value pairs (string, integer)
//! - Single-line integer arrays: sensors = [73, 72]
//! - Comments (# ...), including after a value
//!
//! Every key not listed in [`DeviceConfig`] is rejected, so a typo fails
//! loudly instead of silently falling back to a default.

use chevron_protocol::ValueFormat;

use super::types::{DeviceConfig, MAX_SENSORS};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Value of the wrong type or out of range
    InvalidValue,
    /// Too many items (exceeded heapless capacity)
    TooManyItems,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Serial,
    Telemetry,
    Timestamp,
    Monitor,
}

/// Parse TOML configuration into DeviceConfig
///
/// Keys that are absent keep their defaults.
pub fn parse_config(input: &str) -> Result<DeviceConfig, ParseError> {
    let mut config = DeviceConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            let header = line
                .strip_prefix('[')
                .and_then(|l| l.strip_suffix(']'))
                .ok_or(ParseError::InvalidSection)?;
            section = parse_section_header(header)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;
        apply_value(section, key, value, &mut config)?;
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "serial" => Ok(Section::Serial),
        "telemetry" => Ok(Section::Telemetry),
        "timestamp" => Ok(Section::Timestamp),
        "monitor" => Ok(Section::Monitor),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Cut a line at the first `#` that is not inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut DeviceConfig,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Serial, "baudrate") => config.serial.baudrate = parse_nonzero(value)?,
        (Section::Serial, "delimiter") => config.serial.delimiter = parse_byte(value)?,

        (Section::Telemetry, "interval_ms") => {
            config.telemetry.interval_ms = parse_nonzero(value)?
        }
        (Section::Telemetry, "settle_ms") => config.telemetry.settle_ms = parse_int(value)?,
        (Section::Telemetry, "width") => {
            config.telemetry.width = parse_bounded(value, ValueFormat::MAX_WIDTH)?
        }
        (Section::Telemetry, "precision") => {
            config.telemetry.precision = parse_bounded(value, ValueFormat::MAX_PRECISION)?
        }
        (Section::Telemetry, "sensors") => {
            config.telemetry.sensors = parse_array(value)?;
        }

        (Section::Timestamp, "interval_ms") => config.timestamp.interval_ms = parse_int(value)?,
        (Section::Monitor, "interval_ms") => config.monitor.interval_ms = parse_nonzero(value)?,

        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn parse_string(value: &str) -> Result<&str, ParseError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue)
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Periods and rates where 0 is meaningless
fn parse_nonzero(value: &str) -> Result<u32, ParseError> {
    match parse_int(value)? {
        0 => Err(ParseError::InvalidValue),
        n => Ok(n),
    }
}

fn parse_bounded(value: &str, max: u8) -> Result<u8, ParseError> {
    let n: u8 = parse_int(value)?;
    if n > max {
        return Err(ParseError::InvalidValue);
    }
    Ok(n)
}

/// A one-character ASCII string such as `"#"`
fn parse_byte(value: &str) -> Result<u8, ParseError> {
    match parse_string(value)?.as_bytes() {
        [byte] if byte.is_ascii() && *byte != 0 => Ok(*byte),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_array(value: &str) -> Result<heapless::Vec<u8, MAX_SENSORS>, ParseError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ParseError::InvalidValue)?;

    let mut items = heapless::Vec::new();
    for item in inner.split(',') {
        let item = item.trim();
        // Allows a trailing comma and the empty array
        if item.is_empty() {
            continue;
        }
        items
            .push(parse_int(item)?)
            .map_err(|_| ParseError::TooManyItems)?;
    }
    Ok(items)
}
