//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels and the
//! shared remote state.

pub mod command;
pub mod monitor;
pub mod serial_rx;
pub mod telemetry;

pub use command::command_task;
pub use monitor::monitor_task;
pub use serial_rx::serial_rx_task;
pub use telemetry::{telemetry_task, TelemetryTaskConfig};
