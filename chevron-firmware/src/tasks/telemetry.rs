//! Telemetry transmit task
//!
//! Sends temperature frames and timestamp frames on their own cadences.
//! Sensors and RTC share I2C0; each tick borrows the bus for one driver.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_rp::uart::BufferedUartTx;
use embassy_time::{Delay, Duration, Ticker};

use chevron_core::config::{TelemetryConfig, TimestampConfig};
use chevron_core::{send, TelemetryReporter};
use chevron_drivers::{Ds3231, Tmp1075};
use chevron_protocol::MAX_TELEMETRY_LEN;

use crate::board::{HalI2c, IoTx};

/// Settings handed to the telemetry task
pub struct TelemetryTaskConfig {
    pub telemetry: TelemetryConfig,
    pub timestamp: TimestampConfig,
}

#[embassy_executor::task]
pub async fn telemetry_task(
    tx: BufferedUartTx,
    i2c: I2c<'static, I2C0, Blocking>,
    config: TelemetryTaskConfig,
) {
    info!(
        "Telemetry task started ({} sensors every {}ms)",
        config.telemetry.sensors.len(),
        config.telemetry.interval_ms
    );

    let reporter = TelemetryReporter::new(&config.telemetry);
    let mut tx = IoTx(tx);
    let mut bus = HalI2c(i2c);
    let mut delay = Delay;
    // Payload plus NUL terminator
    let mut frame = [0u8; MAX_TELEMETRY_LEN + 1];

    let mut temp_ticker =
        Ticker::every(Duration::from_millis(config.telemetry.interval_ms as u64));
    let mut time_ticker = config
        .timestamp
        .enabled()
        .then(|| Ticker::every(Duration::from_millis(config.timestamp.interval_ms as u64)));

    loop {
        let next_timestamp = async {
            match time_ticker.as_mut() {
                Some(ticker) => ticker.next().await,
                None => core::future::pending().await,
            }
        };

        match select(temp_ticker.next(), next_timestamp).await {
            Either::First(()) => {
                let mut sensors = Tmp1075::new(&mut bus);
                let len = reporter
                    .encode_temperatures(&mut sensors, &mut delay, &mut frame)
                    .await;
                trace!("Telemetry: {=[u8]:a}", &frame[..len]);
                if let Err(e) = send(&mut tx, &frame[..len]) {
                    warn!("Failed to send telemetry: {:?}", e);
                }
            }
            Either::Second(()) => {
                let mut rtc = Ds3231::new(&mut bus);
                // Clock failures are logged by the reporter
                if let Ok(stamp) = reporter.encode_timestamp(&mut rtc) {
                    if let Err(e) = send(&mut tx, stamp.as_bytes()) {
                        warn!("Failed to send timestamp: {:?}", e);
                    }
                }
            }
        }
    }
}
