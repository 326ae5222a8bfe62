//! Chevron serial link protocol
//!
//! Text protocol spoken between the motion controller and the remote axis
//! controller over a single UART.
//!
//! # Protocol Overview
//!
//! Inbound lines are either status reports or plain commands:
//! ```text
//! >{"p":X12,"r":1,"b":0,"o":0,"u":1,"v":42}Z#     status report
//! >TMA10                                          command
//! ```
//!
//! Outbound frames are sensor telemetry and timestamps:
//! ```text
//! {"temp_system":21.3,"temp_drivers":19.8}
//! D:090507_031124;
//! ```
//!
//! Received bytes flow through these stages:
//! ```text
//! bytes ─► LineReader ─► RawLine ─► CanonicalCommand ─► parse_frame ─► RemoteState
//! ```
//!
//! Everything here works on fixed-capacity buffers and never allocates.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod line;
pub mod reader;
pub mod sanitize;
pub mod status;
pub mod telemetry;
pub mod timestamp;

pub use line::{write_terminated, CapacityError, LineBuffer, RawLine, LINE_CAPACITY};
pub use reader::{LineError, LineReader, DEFAULT_DELIMITER};
pub use sanitize::{
    sanitize, strip_leading_t, CanonicalCommand, FrameKind, PrefixOutcome, SanitizeReport,
    CHEVRON, STATUS_SUFFIX,
};
pub use status::{parse_frame, FieldSet, ParseOutcome, RemoteState, Tag, POSITION_CAPACITY};
pub use telemetry::{
    FrameBuilder, SensorKey, SensorReading, TelemetryFrame, ValueFormat, MAX_TELEMETRY_LEN,
};
pub use timestamp::{DateTime, TimestampFrame, TIMESTAMP_LEN};
