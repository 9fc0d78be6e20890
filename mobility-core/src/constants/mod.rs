//! Constants for the Mobility Core
//!
//! Every tuning value used by the inference and control algorithms lives
//! here, grouped by the component that consumes it. None of these are
//! learned; they are hand-tuned against field traces and changing them
//! changes observable behaviour (step counts, mode switch timing, battery).
//!
//! ## Organization
//!
//! - **Step**: accelerometer windowing and peak gating
//! - **Belief**: HMM prior, evidence floor and transition table
//! - **Tracking**: tracking-mode dwell thresholds, sampling intervals and
//!   persistence staleness
//!
//! Time values carry their unit in the name (`_MS` wall-clock milliseconds,
//! `_NS` sensor nanoseconds).

/// Step detection windows and thresholds.
pub mod step;

/// HMM prior, emission floor and transition probabilities.
pub mod belief;

/// Tracking-mode thresholds, sampling configurations and staleness policy.
pub mod tracking;

pub use step::{
    PEAK_WINDOW_NS, MOVING_AVERAGE_WINDOW_NS, MAGNITUDE_THRESHOLD,
    VARIANCE_THRESHOLD, MIN_VARIANCE_SAMPLES, SAMPLE_BUFFER_CAPACITY,
};

pub use belief::{PSEUDO_COUNT, DEFAULT_PRIOR, TRANSITION_TABLE};

pub use tracking::{STATE_EXPIRATION_MS, KEEP_ALIVE_INTERVAL_MS, STEP_SESSION_RUN_MS};
