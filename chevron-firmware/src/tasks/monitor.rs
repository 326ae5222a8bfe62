//! Remote state monitor
//!
//! Consumer side of the shared remote state: polls it at a fixed cadence
//! and reports changes. Control logic reading the remote axis hooks in here.

use defmt::*;
use embassy_time::{Duration, Ticker};

use crate::SharedRemoteState;

/// Polls without a new report before warning
const STALE_AFTER_POLLS: u32 = 50;

#[embassy_executor::task]
pub async fn monitor_task(shared: &'static SharedRemoteState, interval_ms: u32) {
    info!("Monitor task started ({}ms)", interval_ms);

    let mut ticker = Ticker::every(Duration::from_millis(interval_ms as u64));
    let mut last_seen = 0u32;
    let mut quiet_polls = 0u32;

    loop {
        ticker.next().await;

        match shared.changed_since(last_seen) {
            Some(versioned) => {
                if versioned.generation != last_seen.wrapping_add(1) && last_seen != 0 {
                    debug!(
                        "Skipped {} reports",
                        versioned.generation.wrapping_sub(last_seen).wrapping_sub(1)
                    );
                }
                let state = &versioned.state;
                info!(
                    "Remote: pos={} ref={} busy={} back={} front={} speed={}",
                    state.position.as_str(),
                    state.referenced,
                    state.busy,
                    state.back,
                    state.front,
                    state.speed
                );
                last_seen = versioned.generation;
                quiet_polls = 0;
            }
            None => {
                quiet_polls = quiet_polls.saturating_add(1);
                if quiet_polls == STALE_AFTER_POLLS {
                    warn!("No status report for {} polls", STALE_AFTER_POLLS);
                }
            }
        }
    }
}
