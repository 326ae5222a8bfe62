//! Command task
//!
//! Receives canonical command lines. The command vocabulary belongs to the
//! motion layer; this task is where it plugs in, and for now it only logs.

use defmt::*;

use crate::channels::COMMAND_CHANNEL;

#[embassy_executor::task]
pub async fn command_task() {
    info!("Command task started");

    loop {
        let cmd = COMMAND_CHANNEL.receive().await;
        info!("Command: {}", cmd);
    }
}
