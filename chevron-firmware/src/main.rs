//! Chevron - serial command/telemetry link firmware
//!
//! Main firmware binary for RP2040-based motion controller boards. Talks to
//! the remote axis controller over UART0: status reports come in and are
//! published as shared state, temperature and timestamp frames go out.
//!
//! Named after the `>` that opens every status report on the wire.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::I2c;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Uart};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use chevron_core::config::{parse_config, DeviceConfig};
use chevron_core::RemoteStateCell;
use chevron_hal::{I2cConfig, UartConfig};

use crate::tasks::TelemetryTaskConfig;

mod board;
mod channels;
mod tasks;

/// Shared remote state as used on this target
pub type SharedRemoteState = RemoteStateCell<CriticalSectionRawMutex>;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// Embedded configuration (compiled into firmware)
/// Edit device.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../device.toml");

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 512]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

static REMOTE_STATE: StaticCell<SharedRemoteState> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Chevron firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    // Link UART
    let uart_config = board::uart_config(&UartConfig::with_baudrate(config.serial.baudrate));
    let tx_buf = TX_BUF.init([0u8; 512]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized at {} baud", config.serial.baudrate);

    // Sensor and RTC bus
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, board::i2c_config(&I2cConfig::STANDARD));
    info!("I2C initialized");

    let shared: &'static SharedRemoteState = REMOTE_STATE.init(RemoteStateCell::new());

    let DeviceConfig {
        serial,
        telemetry,
        timestamp,
        monitor,
    } = config;

    spawner
        .spawn(tasks::serial_rx_task(rx, shared, serial.delimiter))
        .unwrap();
    spawner.spawn(tasks::command_task()).unwrap();
    spawner
        .spawn(tasks::monitor_task(shared, monitor.interval_ms))
        .unwrap();
    spawner
        .spawn(tasks::telemetry_task(
            tx,
            i2c,
            TelemetryTaskConfig {
                telemetry,
                timestamp,
            },
        ))
        .unwrap();

    info!("All tasks spawned");
}

/// Parse the embedded configuration, falling back to defaults
fn load_config() -> DeviceConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Configuration loaded");
            config
        }
        Err(e) => {
            warn!("Invalid embedded configuration ({:?}), using defaults", e);
            DeviceConfig::default()
        }
    }
}
