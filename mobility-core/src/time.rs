//! Time handling for the mobility core
//!
//! Two clocks are in play:
//! - Wall-clock milliseconds (`Timestamp`) for classification events, dwell,
//!   episodes and persisted state
//! - Monotonic nanoseconds (`SampleTime`) stamped on accelerometer samples by
//!   the sensor driver
//!
//! The core never reads a clock on the sample path. The engine asks its
//! `TimeSource` for "now" only for keep-alive ticks and cold start.

/// Wall-clock timestamp in milliseconds since epoch
pub type Timestamp = u64;

/// Monotonic sensor timestamp in nanoseconds
pub type SampleTime = i64;

/// Sentinel for a detection window that has not been opened
pub const UNSET_SAMPLE_TIME: SampleTime = -1;

/// Nanoseconds per second, for sensor-time constants
pub const NANOS_PER_SECOND: SampleTime = 1_000_000_000;

/// Source of wall-clock time for the engine
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Controllable time source for tests and replays
///
/// Interior mutability lets a test advance the clock while the engine holds
/// the source by value.
#[derive(Debug, Clone, Default)]
pub struct MockTimeSource {
    timestamp: core::cell::Cell<Timestamp>,
}

impl MockTimeSource {
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp: core::cell::Cell::new(timestamp),
        }
    }

    pub fn set(&self, timestamp: Timestamp) {
        self.timestamp.set(timestamp);
    }

    pub fn advance(&self, ms: u64) {
        self.timestamp.set(self.timestamp.get() + ms);
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.timestamp.get()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Milliseconds elapsed from `earlier` to `later`, zero if the clock went backwards
pub fn elapsed_ms(earlier: Timestamp, later: Timestamp) -> u64 {
    later.saturating_sub(earlier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_time_advances() {
        let time = MockTimeSource::new(1000);
        assert_eq!(time.now(), 1000);

        time.advance(500);
        assert_eq!(time.now(), 1500);

        time.set(10);
        assert_eq!(time.now(), 10);
    }

    #[test]
    fn borrowed_source_reads_through() {
        let time = MockTimeSource::new(42);
        let by_ref = &time;
        time.advance(8);
        assert_eq!(by_ref.now(), 50);
    }

    #[test]
    fn elapsed_saturates() {
        assert_eq!(elapsed_ms(1000, 1500), 500);
        assert_eq!(elapsed_ms(1500, 1000), 0);
    }
}
