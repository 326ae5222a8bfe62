//! Link UART receive task
//!
//! Assembles lines from the UART and runs each through the receive path.
//! Status reports end up in the shared remote state; commands are passed
//! on to the command task.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use chevron_core::{Ingested, LineIngest};
use chevron_protocol::{LineReader, LINE_CAPACITY};

use crate::channels::COMMAND_CHANNEL;
use crate::SharedRemoteState;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Log the ingest counters every this many lines
const STATS_EVERY: u32 = 1000;

/// Serial RX task - receives lines and publishes status reports
#[embassy_executor::task]
pub async fn serial_rx_task(
    mut rx: BufferedUartRx,
    shared: &'static SharedRemoteState,
    delimiter: u8,
) {
    info!("Serial RX task started");

    let mut reader = LineReader::<LINE_CAPACITY>::with_delimiter(delimiter);
    let mut ingest = LineIngest::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        let n = match rx.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                warn!("UART read error: {:?}", e);
                reader.reset();
                continue;
            }
        };

        for &byte in &buf[..n] {
            match reader.feed(byte) {
                Ok(Some(line)) => match ingest.ingest(line, shared) {
                    Ingested::Status { generation, .. } => {
                        trace!("Status report published, generation {}", generation);
                    }
                    Ingested::Command(cmd) => {
                        if COMMAND_CHANNEL.try_send(cmd).is_err() {
                            warn!("Command channel full, dropping command");
                        }
                    }
                    Ingested::Rejected => debug!("Status report without fields dropped"),
                    Ingested::Empty => {}
                },
                Ok(None) => {}
                Err(e) => warn!("Line error: {:?}", e),
            }
        }

        let stats = ingest.stats();
        if stats.lines > 0 && stats.lines % STATS_EVERY == 0 {
            debug!("Ingest stats: {:?}", stats);
        }
    }
}
