//! Windowed Peak Detector with Magnitude and Variance Gates
//!
//! A detection window is opened with [`PeakDetector::start`] and fed one
//! smoothed sample at a time. Two gates watch the stream independently:
//!
//! - **Magnitude gate**: the middle of the last three samples is a strict
//!   local maximum above `magnitude_threshold`
//! - **Variance gate**: once `min_variance_samples` have been seen, the
//!   population variance of the window exceeds `variance_threshold`
//!
//! ```text
//!          start()            magnitude gate ─┐
//!   Idle ──────────► Open ──┤                 ├──► Detected
//!                           variance gate ───┘
//! ```
//!
//! A smooth acceleration produces a clean peak with little variance; jitter
//! produces variance with no clean peak. Only a window that shows both is a
//! step. Gates only ever go from false to true within a window, so a window
//! reports at most one detection.

use crate::constants::step::{MAGNITUDE_THRESHOLD, MIN_VARIANCE_SAMPLES, VARIANCE_THRESHOLD};
use crate::errors::{MobilityError, MobilityResult};
use crate::time::{SampleTime, UNSET_SAMPLE_TIME};

/// Gate thresholds for a [`PeakDetector`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakDetectorConfig {
    /// Value a local maximum must exceed
    pub magnitude_threshold: f32,
    /// Window variance that must be exceeded
    pub variance_threshold: f32,
    /// Samples required before the variance gate is evaluated
    pub min_variance_samples: u32,
}

impl Default for PeakDetectorConfig {
    fn default() -> Self {
        Self {
            magnitude_threshold: MAGNITUDE_THRESHOLD,
            variance_threshold: VARIANCE_THRESHOLD,
            min_variance_samples: MIN_VARIANCE_SAMPLES,
        }
    }
}

impl PeakDetectorConfig {
    pub fn with_magnitude_threshold(mut self, threshold: f32) -> Self {
        self.magnitude_threshold = threshold;
        self
    }

    pub fn with_variance_threshold(mut self, threshold: f32) -> Self {
        self.variance_threshold = threshold;
        self
    }

    pub fn with_min_variance_samples(mut self, samples: u32) -> Self {
        self.min_variance_samples = samples;
        self
    }
}

/// Where the current window stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorPhase {
    /// No window has been opened
    Idle,
    /// Window open, neither gate fired
    Open,
    /// Only the magnitude gate fired
    MagnitudeGated,
    /// Only the variance gate fired
    VarianceGated,
    /// Both gates fired
    Detected,
}

/// Stateful single-window peak detector
#[derive(Debug, Clone)]
pub struct PeakDetector {
    config: PeakDetectorConfig,
    window_start: SampleTime,
    /// Last three samples, oldest first
    recent: [Option<f32>; 3],
    sum: f64,
    sum_of_squares: f64,
    count: u32,
    magnitude_exceeded: bool,
    variance_exceeded: bool,
}

impl Default for PeakDetector {
    fn default() -> Self {
        Self::new(PeakDetectorConfig::default())
    }
}

impl PeakDetector {
    pub fn new(config: PeakDetectorConfig) -> Self {
        Self {
            config,
            window_start: UNSET_SAMPLE_TIME,
            recent: [None; 3],
            sum: 0.0,
            sum_of_squares: 0.0,
            count: 0,
            magnitude_exceeded: false,
            variance_exceeded: false,
        }
    }

    pub fn config(&self) -> &PeakDetectorConfig {
        &self.config
    }

    /// Open a fresh window at `window_start`
    ///
    /// Clears both gates, the recency slots and the variance accumulators.
    pub fn start(&mut self, window_start: SampleTime) -> MobilityResult<()> {
        if window_start == UNSET_SAMPLE_TIME {
            log_error!("peak detector started at the unset sentinel time");
            return Err(MobilityError::UnsetWindowStart);
        }

        self.window_start = window_start;
        self.recent = [None; 3];
        self.sum = 0.0;
        self.sum_of_squares = 0.0;
        self.count = 0;
        self.magnitude_exceeded = false;
        self.variance_exceeded = false;
        Ok(())
    }

    /// Close the current window and open the next one
    pub fn restart(&mut self, window_start: SampleTime) -> MobilityResult<()> {
        self.start(window_start)
    }

    pub fn started(&self) -> bool {
        self.window_start != UNSET_SAMPLE_TIME
    }

    /// True once both gates fired in the current window
    pub fn detected(&self) -> bool {
        self.magnitude_exceeded && self.variance_exceeded
    }

    /// Start of the current window, `UNSET_SAMPLE_TIME` when idle
    pub fn start_time(&self) -> SampleTime {
        self.window_start
    }

    pub fn phase(&self) -> DetectorPhase {
        match (self.started(), self.magnitude_exceeded, self.variance_exceeded) {
            (false, _, _) => DetectorPhase::Idle,
            (true, true, true) => DetectorPhase::Detected,
            (true, true, false) => DetectorPhase::MagnitudeGated,
            (true, false, true) => DetectorPhase::VarianceGated,
            (true, false, false) => DetectorPhase::Open,
        }
    }

    /// Feed one sample into the open window
    ///
    /// Returns whether both gates have fired. Once true it stays true until
    /// the next `start`/`restart`.
    pub fn push_and_detect(&mut self, value: f32) -> MobilityResult<bool> {
        if !self.started() {
            log_error!("peak detector fed before a window was started");
            return Err(MobilityError::DetectorNotStarted);
        }

        if !self.magnitude_exceeded {
            self.push_recent(value);
            self.magnitude_exceeded = self.middle_is_peak();
        }

        if !self.variance_exceeded {
            let v = value as f64;
            self.sum += v;
            self.sum_of_squares += v * v;
            self.count += 1;

            if self.count >= self.config.min_variance_samples
                && self.variance() > self.config.variance_threshold as f64
            {
                self.variance_exceeded = true;
            }
        }

        Ok(self.detected())
    }

    fn push_recent(&mut self, value: f32) {
        match self.recent.iter().position(Option::is_none) {
            Some(slot) => self.recent[slot] = Some(value),
            None => {
                self.recent.rotate_left(1);
                self.recent[2] = Some(value);
            }
        }
    }

    fn middle_is_peak(&self) -> bool {
        match self.recent {
            [Some(before), Some(mid), Some(after)] => {
                mid > self.config.magnitude_threshold && mid > before && mid > after
            }
            _ => false,
        }
    }

    /// Population variance of the samples accumulated so far
    ///
    /// `(n·Σx² − (Σx)²) / n²`
    fn variance(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let n = self.count as f64;
        (n * self.sum_of_squares - self.sum * self.sum) / (n * n)
    }
}
