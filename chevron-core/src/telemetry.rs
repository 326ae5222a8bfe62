//! Periodic outbound frames
//!
//! Reads the configured sensors and the wall clock and encodes the frames
//! sent over the serial link. Nothing here touches the shared remote state.

use chevron_hal::UartTx;
use chevron_protocol::{
    FrameBuilder, SensorReading, TelemetryFrame, TimestampFrame, ValueFormat,
};
use embedded_hal_async::delay::DelayNs;
use heapless::Vec;

use crate::config::{TelemetryConfig, MAX_SENSORS};
use crate::logging::log_warn;
use crate::traits::{ClockError, TemperatureProbe, WallClock};

/// Builds temperature and timestamp frames from live readings
#[derive(Debug, Clone)]
pub struct TelemetryReporter {
    sensors: Vec<u8, MAX_SENSORS>,
    format: ValueFormat,
    settle_ms: u32,
}

impl TelemetryReporter {
    pub fn new(config: &TelemetryConfig) -> Self {
        Self {
            sensors: config.sensors.clone(),
            format: ValueFormat::new(config.width, config.precision),
            settle_ms: config.settle_ms,
        }
    }

    /// Sensor addresses, in reporting order
    pub fn sensors(&self) -> &[u8] {
        &self.sensors
    }

    /// Read every sensor and encode the frame
    ///
    /// Sensors are read in configured order, awaiting `settle_ms` between
    /// readings so other tasks keep running. A sensor that fails to read
    /// is left out of the frame.
    pub async fn temperature_frame<P, D>(&self, probe: &mut P, delay: &mut D) -> TelemetryFrame
    where
        P: TemperatureProbe,
        D: DelayNs,
    {
        let mut builder = FrameBuilder::new(self.format);
        for (i, &address) in self.sensors.iter().enumerate() {
            if i > 0 && self.settle_ms > 0 {
                delay.delay_ms(self.settle_ms).await;
            }
            match probe.read_celsius(address) {
                Ok(value) => {
                    if !builder.push(SensorReading::new(address, value)) {
                        log_warn!("sensor {} left out of telemetry frame", address);
                    }
                }
                Err(e) => log_warn!("sensor {} read failed: {:?}", address, e),
            }
        }
        builder.finish()
    }

    /// Encode a temperature frame into `out`
    ///
    /// The frame is NUL-terminated and truncated to fit. Returns the number
    /// of payload bytes written.
    pub async fn encode_temperatures<P, D>(
        &self,
        probe: &mut P,
        delay: &mut D,
        out: &mut [u8],
    ) -> usize
    where
        P: TemperatureProbe,
        D: DelayNs,
    {
        self.temperature_frame(probe, delay).await.write_terminated(out)
    }

    /// Read the clock and encode a `D:HHMMSS_DDMMYY;` frame
    pub fn encode_timestamp<C: WallClock>(&self, clock: &mut C) -> Result<TimestampFrame, ClockError> {
        let now = clock.now().inspect_err(|e| log_warn!("clock read failed: {:?}", e))?;
        Ok(TimestampFrame::encode(&now))
    }
}

/// Write a frame to the link and wait for it to leave
pub fn send<T: UartTx>(tx: &mut T, frame: &[u8]) -> Result<(), T::Error> {
    tx.write_blocking(frame)?;
    tx.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::SensorError;
    use chevron_protocol::DateTime;
    use core::convert::Infallible;
    use embassy_futures::block_on;

    struct FakeProbe {
        readings: &'static [(u8, Result<f32, SensorError>)],
        reads: std::vec::Vec<u8>,
    }

    impl FakeProbe {
        fn new(readings: &'static [(u8, Result<f32, SensorError>)]) -> Self {
            Self {
                readings,
                reads: std::vec::Vec::new(),
            }
        }
    }

    impl TemperatureProbe for FakeProbe {
        fn read_celsius(&mut self, address: u8) -> Result<f32, SensorError> {
            self.reads.push(address);
            self.readings
                .iter()
                .find(|(a, _)| *a == address)
                .map(|(_, r)| *r)
                .unwrap_or(Err(SensorError::Bus))
        }
    }

    #[derive(Default)]
    struct FakeDelay {
        total_ms: u32,
        waits: usize,
    }

    impl DelayNs for FakeDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.total_ms += ns / 1_000_000;
            self.waits += 1;
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.total_ms += ms;
            self.waits += 1;
        }
    }

    struct FakeClock(Result<DateTime, ClockError>);

    impl WallClock for FakeClock {
        fn now(&mut self) -> Result<DateTime, ClockError> {
            self.0
        }
    }

    #[derive(Default)]
    struct FakeTx {
        written: std::vec::Vec<u8>,
        flushes: usize,
    }

    impl UartTx for FakeTx {
        type Error = Infallible;

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), Infallible> {
            self.written.extend_from_slice(data);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Infallible> {
            self.flushes += 1;
            Ok(())
        }
    }

    fn config(sensors: &[u8]) -> TelemetryConfig {
        TelemetryConfig {
            sensors: Vec::from_slice(sensors).unwrap(),
            ..TelemetryConfig::default()
        }
    }

    #[test]
    fn test_encode_two_sensors() {
        let reporter = TelemetryReporter::new(&config(&[73, 72]));
        let mut probe = FakeProbe::new(&[(73, Ok(21.3)), (72, Ok(19.8))]);
        let mut delay = FakeDelay::default();
        let mut out = [0u8; 64];

        let n = block_on(reporter.encode_temperatures(&mut probe, &mut delay, &mut out));
        assert_eq!(&out[..n], b"{\"temp_system\":21.3,\"temp_drivers\":19.8}");
        assert_eq!(out[n], 0);
        assert_eq!(probe.reads, [73, 72]);
        // Settle time only between readings
        assert_eq!(delay.total_ms, 10);
    }

    #[test]
    fn test_failed_sensor_is_skipped() {
        let reporter = TelemetryReporter::new(&config(&[73, 75, 72]));
        let mut probe = FakeProbe::new(&[(73, Ok(20.0)), (75, Err(SensorError::Bus)), (72, Ok(30.0))]);
        let frame = block_on(reporter.temperature_frame(&mut probe, &mut FakeDelay::default()));
        assert_eq!(frame.as_str(), "{\"temp_system\":20.0,\"temp_drivers\":30.0}");
    }

    #[test]
    fn test_no_sensors() {
        let reporter = TelemetryReporter::new(&config(&[]));
        let mut probe = FakeProbe::new(&[]);
        let mut delay = FakeDelay::default();
        let mut out = [0xAAu8; 4];
        let n = block_on(reporter.encode_temperatures(&mut probe, &mut delay, &mut out));
        assert_eq!(&out[..n + 1], b"{}\0");
        assert_eq!(delay.total_ms, 0);
    }

    #[test]
    fn test_small_buffer_is_terminated() {
        let reporter = TelemetryReporter::new(&config(&[73, 72]));
        let mut probe = FakeProbe::new(&[(73, Ok(21.3)), (72, Ok(19.8))]);
        let mut out = [0xAAu8; 10];
        let n = block_on(reporter.encode_temperatures(&mut probe, &mut FakeDelay::default(), &mut out));
        assert_eq!(n, 9);
        assert_eq!(&out[..9], b"{\"temp_sy");
        assert_eq!(out[9], 0);

        let mut empty: [u8; 0] = [];
        assert_eq!(
            block_on(reporter.encode_temperatures(&mut probe, &mut FakeDelay::default(), &mut empty)),
            0
        );
    }

    #[test]
    fn test_settle_awaited_between_readings() {
        let mut cfg = config(&[73, 72, 80, 74]);
        cfg.settle_ms = 7;
        let reporter = TelemetryReporter::new(&cfg);
        let mut probe = FakeProbe::new(&[(73, Ok(1.0)), (72, Ok(2.0)), (80, Ok(3.0)), (74, Ok(4.0))]);
        let mut delay = FakeDelay::default();
        block_on(reporter.temperature_frame(&mut probe, &mut delay));
        assert_eq!(delay.waits, 3);
        assert_eq!(delay.total_ms, 21);

        cfg.settle_ms = 0;
        let reporter = TelemetryReporter::new(&cfg);
        let mut delay = FakeDelay::default();
        block_on(reporter.temperature_frame(&mut probe, &mut delay));
        assert_eq!(delay.waits, 0);
    }

    #[test]
    fn test_format_from_config() {
        let mut cfg = config(&[80]);
        cfg.width = 6;
        cfg.precision = 2;
        let reporter = TelemetryReporter::new(&cfg);
        let mut probe = FakeProbe::new(&[(80, Ok(5.0))]);
        let frame = block_on(reporter.temperature_frame(&mut probe, &mut FakeDelay::default()));
        assert_eq!(frame.as_str(), "{\"80\":  5.00}");
    }

    #[test]
    fn test_timestamp() {
        let reporter = TelemetryReporter::new(&TelemetryConfig::default());
        let time = DateTime {
            hour: 23,
            minute: 59,
            second: 1,
            day: 28,
            month: 2,
            year: 25,
        };
        let frame = reporter.encode_timestamp(&mut FakeClock(Ok(time))).unwrap();
        assert_eq!(frame.as_str(), "D:235901_280225;");

        let err = reporter.encode_timestamp(&mut FakeClock(Err(ClockError::Stopped)));
        assert_eq!(err, Err(ClockError::Stopped));
    }

    #[test]
    fn test_send_writes_and_flushes() {
        let mut tx = FakeTx::default();
        send(&mut tx, b"D:000000_010100;").unwrap();
        assert_eq!(tx.written, b"D:000000_010100;");
        assert_eq!(tx.flushes, 1);
    }
}
