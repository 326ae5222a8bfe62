//! Shared remote controller state
//!
//! The receive path publishes each parsed status report here; control
//! logic reads it at its own cadence.

pub mod remote;

pub use remote::{RemoteStateCell, Versioned};
