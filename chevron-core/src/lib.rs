//! Board-agnostic core logic for the Chevron serial link
//!
//! This crate contains the application logic that sits between the wire
//! protocol and the hardware:
//!
//! - Collaborator traits (temperature probe, wall clock)
//! - Receive path: sanitize, classify, parse and publish a line
//! - Shared remote state with tear-free publication
//! - Telemetry reporter for outbound frames
//! - Configuration types and parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

mod logging;

pub mod config;
pub mod ingest;
pub mod state;
pub mod telemetry;
pub mod traits;

pub use ingest::{canonicalize, IngestStats, Ingested, LineIngest};
pub use state::{RemoteStateCell, Versioned};
pub use telemetry::{send, TelemetryReporter};
