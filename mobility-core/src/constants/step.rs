//! Step Detection Constants
//!
//! The step counter smooths accelerometer magnitude with a centered moving
//! average and looks for at most one qualifying peak per detection window.
//! Sensor timestamps are nanoseconds.

use crate::time::{SampleTime, NANOS_PER_SECOND};

/// Length of one peak-detection window (0.59 s).
///
/// At most one step is reported per window, so this also bounds cadence at
/// roughly 1.7 steps per second per counter.
pub const PEAK_WINDOW_NS: SampleTime = 59 * NANOS_PER_SECOND / 100;

/// Length of the moving-average window over raw magnitude (0.31 s).
pub const MOVING_AVERAGE_WINDOW_NS: SampleTime = 31 * NANOS_PER_SECOND / 100;

/// Smoothed magnitude a local maximum must exceed (m/s²).
///
/// Gravity alone is ~9.81, so a peak needs ~0.7 m/s² of vertical bounce.
pub const MAGNITUDE_THRESHOLD: f32 = 10.5;

/// Population variance of smoothed magnitude required within a window.
pub const VARIANCE_THRESHOLD: f32 = 0.36;

/// Samples needed before the variance gate may fire.
pub const MIN_VARIANCE_SAMPLES: u32 = 5;

/// Capacity of the moving-average sample buffer.
///
/// 400 samples over 0.31 s tolerates sensor rates up to ~1.2 kHz.
pub const SAMPLE_BUFFER_CAPACITY: usize = 400;

/// Buffered samples required before the moving average is trusted.
pub const MOVING_AVERAGE_WARMUP: usize = 10;
