//! Tracking Mode Constants
//!
//! Dwell thresholds decide how long the controller stays in a "just entered"
//! mode before committing to the settled, cheaper configuration. Sampling
//! intervals are handed verbatim to the location/activity provider.

use crate::time::Timestamp;

// ===== DWELL THRESHOLDS =====

/// Dwell in STILL before "just started dwelling" settles into DWELL (2 min).
pub const DWELL_SETTLE_MS: u64 = 120 * 1000;

/// Dwell in a foot/bicycle state before settling into WALKING (40 s).
pub const WALKING_SETTLE_MS: u64 = 40 * 1000;

/// Dwell in VEHICLE before settling into VEHICLE (50 s).
pub const VEHICLE_SETTLE_MS: u64 = 50 * 1000;

// ===== SAMPLING INTERVALS =====

/// Fastest location interval used by every settled mode (10 s).
pub const SETTLED_FASTEST_INTERVAL_MS: u64 = 10 * 1000;

/// Fastest location interval used by transitional modes (5 s).
pub const TRANSITIONAL_FASTEST_INTERVAL_MS: u64 = 5 * 1000;

/// Steady location interval while dwelling (10 min).
pub const DWELL_LOCATION_INTERVAL_MS: u64 = 600 * 1000;

/// Steady location interval while walking (10 s).
pub const WALKING_LOCATION_INTERVAL_MS: u64 = 10 * 1000;

/// Steady location interval while in a vehicle (5 min).
pub const VEHICLE_LOCATION_INTERVAL_MS: u64 = 300 * 1000;

/// Activity classification interval in settled DWELL and VEHICLE (20 s).
pub const RELAXED_ACTIVITY_INTERVAL_MS: u64 = 20 * 1000;

/// Activity classification interval while walking (10 s).
pub const WALKING_ACTIVITY_INTERVAL_MS: u64 = 10 * 1000;

/// Activity classification interval in transitional modes (5 s).
pub const TRANSITIONAL_ACTIVITY_INTERVAL_MS: u64 = 5 * 1000;

/// Minimum displacement between vehicle location fixes (m).
pub const VEHICLE_MIN_DISPLACEMENT_M: f32 = 50.0;

// ===== HOST SCHEDULING =====

/// Interval at which the host is expected to deliver keep-alive ticks (15 min).
pub const KEEP_ALIVE_INTERVAL_MS: u64 = 15 * 60 * 1000;

/// Age after which persisted state is considered stale at cold start (20 min).
///
/// Longer than the keep-alive interval, so state refreshed by the last tick
/// is never stale on its own.
pub const STATE_EXPIRATION_MS: u64 = 20 * 60 * 1000;

/// How long a step-count session runs after the last on-foot classification (30 s).
pub const STEP_SESSION_RUN_MS: Timestamp = 30 * 1000;
