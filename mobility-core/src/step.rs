//! Streaming Step Counter
//!
//! Turns raw 3-axis accelerometer samples into a monotonically increasing
//! step count using constant memory:
//!
//! ```text
//! (x,y,z) ─► |a| ─► moving-average window ─► SMA(t_mid) ─► PeakDetector ─► step
//!                   (0.31 s, running sum)                   (0.59 s windows)
//! ```
//!
//! 1. Magnitude is the Euclidean norm of the sample.
//! 2. Samples older than `t - moving_average_window` are evicted, then the new
//!    sample is pushed.
//! 3. Once more than `warmup_samples` are buffered, the simple moving average
//!    is taken and stamped at the midpoint of the oldest and newest sample.
//! 4. The SMA feeds the current peak-detection window. A detection counts one
//!    step; later samples in the same window are ignored.
//! 5. When the SMA time passes the end of the window, a new window opens at
//!    that time and the SMA becomes its first sample.
//!
//! Samples must arrive in sensor-time order. The counter holds no clock of
//! its own.

use crate::buffer::{RingAccumulator, TimedValue, ValueSum};
use crate::constants::step::{
    MOVING_AVERAGE_WARMUP, MOVING_AVERAGE_WINDOW_NS, PEAK_WINDOW_NS, SAMPLE_BUFFER_CAPACITY,
};
use crate::errors::{MobilityError, MobilityResult};
use crate::peak::{PeakDetector, PeakDetectorConfig};
use crate::time::SampleTime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One raw accelerometer reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelSample {
    /// Monotonic sensor time in nanoseconds
    pub time: SampleTime,
    /// Acceleration along x (m/s²)
    pub x: f32,
    /// Acceleration along y (m/s²)
    pub y: f32,
    /// Acceleration along z (m/s²)
    pub z: f32,
}

impl AccelSample {
    pub fn new(time: SampleTime, x: f32, y: f32, z: f32) -> Self {
        Self { time, x, y, z }
    }

    /// Euclidean norm of the acceleration vector
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Emitted once per detected step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StepEvent {
    /// Sensor time of the smoothed sample that completed the detection
    pub time: SampleTime,
    /// Cumulative steps including this one
    pub total_steps: u64,
}

/// Step counter tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepCounterConfig {
    /// Length of one peak-detection window (ns)
    pub peak_window: SampleTime,
    /// Length of the moving-average window (ns)
    pub moving_average_window: SampleTime,
    /// Buffered samples required before the average is used
    pub warmup_samples: usize,
    /// Gate thresholds for the peak detector
    pub detector: PeakDetectorConfig,
}

impl Default for StepCounterConfig {
    fn default() -> Self {
        Self {
            peak_window: PEAK_WINDOW_NS,
            moving_average_window: MOVING_AVERAGE_WINDOW_NS,
            warmup_samples: MOVING_AVERAGE_WARMUP,
            detector: PeakDetectorConfig::default(),
        }
    }
}

impl StepCounterConfig {
    pub fn with_peak_window(mut self, window: SampleTime) -> Self {
        self.peak_window = window;
        self
    }

    pub fn with_moving_average_window(mut self, window: SampleTime) -> Self {
        self.moving_average_window = window;
        self
    }

    pub fn with_detector(mut self, detector: PeakDetectorConfig) -> Self {
        self.detector = detector;
        self
    }
}

/// Moving-average + peak-detection step counter
#[derive(Debug, Clone)]
pub struct StepCounter {
    config: StepCounterConfig,
    window: RingAccumulator<TimedValue, ValueSum, SAMPLE_BUFFER_CAPACITY>,
    detector: PeakDetector,
    step_count: u64,
}

impl Default for StepCounter {
    fn default() -> Self {
        Self::new(StepCounterConfig::default())
    }
}

impl StepCounter {
    pub fn new(config: StepCounterConfig) -> Self {
        Self {
            config,
            window: RingAccumulator::new(ValueSum),
            detector: PeakDetector::new(config.detector),
            step_count: 0,
        }
    }

    /// Steps detected since construction
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn config(&self) -> &StepCounterConfig {
        &self.config
    }

    /// Process one accelerometer sample
    ///
    /// Returns the step event when this sample completed a detection.
    /// Non-finite samples are rejected before touching any state. Overflow of
    /// the moving-average buffer means samples arrive faster than its
    /// capacity allows and aborts the sample.
    pub fn process(&mut self, sample: &AccelSample) -> MobilityResult<Option<StepEvent>> {
        if !sample.is_finite() {
            log_warn!("dropping non-finite accelerometer sample at {}", sample.time);
            return Err(MobilityError::InvalidSample);
        }

        let magnitude = sample.magnitude();
        self.evict_before(sample.time.saturating_sub(self.config.moving_average_window))?;
        self.window
            .push(TimedValue { time: sample.time, value: magnitude })
            .map_err(|e| {
                log_error!("moving-average buffer rejected sample at {}: {}", sample.time, e);
                e
            })?;

        if self.window.size() <= self.config.warmup_samples {
            return Ok(None);
        }

        let sma = self.moving_average()?;
        if !self.detector.started() {
            self.detector.start(sma.time)?;
        }

        if sma.time < self.detector.start_time().saturating_add(self.config.peak_window) {
            if !self.detector.detected() && self.detector.push_and_detect(sma.value)? {
                self.step_count += 1;
                log_debug!("step {} at {}", self.step_count, sma.time);
                return Ok(Some(StepEvent {
                    time: sma.time,
                    total_steps: self.step_count,
                }));
            }
        } else {
            self.detector.restart(sma.time)?;
            self.detector.push_and_detect(sma.value)?;
        }

        Ok(None)
    }

    /// Drop buffered samples and the open window, keeping the step total
    ///
    /// Used when the accelerometer stream pauses, so the next burst does not
    /// average across the gap.
    pub fn reset_window(&mut self) {
        self.window.clear();
        self.detector = PeakDetector::new(self.config.detector);
    }

    fn evict_before(&mut self, horizon: SampleTime) -> MobilityResult<()> {
        while let Ok(&TimedValue { time, .. }) = self.window.peek() {
            if time >= horizon {
                break;
            }
            self.window.pop()?;
        }
        Ok(())
    }

    /// Windowed mean, stamped at the midpoint of the buffered span
    fn moving_average(&self) -> MobilityResult<TimedValue> {
        let oldest = self.window.peek()?.time;
        let newest = self.window.head()?.time;
        let value = self.window.sum() / self.window.size() as f64;

        Ok(TimedValue {
            time: oldest.saturating_add(newest.saturating_sub(oldest) / 2),
            value: value as f32,
        })
    }
}
