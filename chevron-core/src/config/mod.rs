//! Device configuration
//!
//! Configuration types plus a minimal TOML-subset parser used at boot to
//! read the configuration compiled into the firmware.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
