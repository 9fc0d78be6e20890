//! Synthetic sensor streams

use std::f64::consts::PI;

use mobility_core::time::NANOS_PER_SECOND;
use mobility_core::{AccelSample, ActivityLabel, ClassificationSample, SampleTime, Timestamp};

/// Vertical bounce on top of gravity, as a phone in a pocket sees it
#[derive(Debug, Clone, Copy)]
pub struct SineWalk {
    /// Seconds per cycle
    pub period_s: f64,
    /// Peak deviation from gravity (m/s²)
    pub amplitude: f64,
    pub rate_hz: u32,
    /// Phase offset (rad)
    pub phase: f64,
    pub gravity: f64,
}

impl Default for SineWalk {
    fn default() -> Self {
        Self {
            period_s: 0.64,
            amplitude: 4.0,
            rate_hz: 200,
            phase: 0.05,
            gravity: 9.81,
        }
    }
}

impl SineWalk {
    pub fn with_period(mut self, period_s: f64) -> Self {
        self.period_s = period_s;
        self
    }

    pub fn with_rate(mut self, rate_hz: u32) -> Self {
        self.rate_hz = rate_hz;
        self
    }

    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Whole and partial cycles in `seconds`
    pub fn cycles(&self, seconds: f64) -> f64 {
        seconds / self.period_s
    }

    /// Samples covering `seconds`, starting at sensor time `start`
    pub fn samples(&self, start: SampleTime, seconds: f64) -> Vec<AccelSample> {
        let count = (seconds * self.rate_hz as f64).round() as i64;
        let dt = NANOS_PER_SECOND / self.rate_hz as i64;

        (0..count)
            .map(|i| {
                let t = i as f64 / self.rate_hz as f64;
                let z = self.gravity + self.amplitude * (2.0 * PI * t / self.period_s + self.phase).sin();
                AccelSample::new(start + i * dt, 0.0, 0.0, z as f32)
            })
            .collect()
    }
}

/// Device lying flat on a table
pub fn resting(start: SampleTime, seconds: f64, rate_hz: u32) -> Vec<AccelSample> {
    SineWalk::default()
        .with_amplitude(0.0)
        .with_rate(rate_hz)
        .samples(start, seconds)
}

/// `count` single-label classifications, `interval_ms` apart
pub fn classifications(
    label: ActivityLabel,
    confidence: u8,
    start: Timestamp,
    interval_ms: u64,
    count: usize,
) -> Vec<ClassificationSample> {
    (0..count as u64)
        .map(|i| ClassificationSample::single(start + i * interval_ms, label, confidence))
        .collect()
}
