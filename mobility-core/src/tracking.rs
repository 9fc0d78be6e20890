//! Power-Aware Tracking Modes
//!
//! ## Overview
//!
//! Each tracking mode is a fixed sensor-sampling configuration. The settled
//! modes (DWELL, WALKING, VEHICLE) are the cheap steady states; each has a
//! "just started" twin that polls faster and more accurately for a bounded
//! settle time after the inferred state changes, while the belief may still
//! be volatile.
//!
//! ```text
//!                 dwell > 120 s
//! JUST_STARTED_DWELL ─────────► DWELL
//!                 dwell > 40 s
//! JUST_STARTED_WALKING ───────► WALKING
//!                 dwell > 50 s
//! JUST_STARTED_VEHICLE ───────► VEHICLE
//! ```
//!
//! ## Configuration Table
//!
//! | Mode                 | Priority | Min disp. | Fastest | Steady | Activity |
//! |----------------------|----------|-----------|---------|--------|----------|
//! | JUST_STARTED_DWELL   | High     | 0 m       | 5 s     | 10 s   | 5 s      |
//! | DWELL                | Balanced | 0 m       | 10 s    | 10 min | 20 s     |
//! | JUST_STARTED_WALKING | High     | 0 m       | 5 s     | 5 s    | 5 s      |
//! | WALKING              | High     | 0 m       | 10 s    | 10 s   | 10 s     |
//! | JUST_STARTED_VEHICLE | High     | 20 m      | 5 s     | 30 s   | 5 s      |
//! | VEHICLE              | High     | 50 m      | 10 s    | 5 min  | 20 s     |
//!
//! ## STILL After Motion
//!
//! A STILL that arrives while the previous mode was walking- or
//! vehicle-related goes straight to DWELL instead of JUST_STARTED_DWELL.
//! Such pauses are usually traffic lights and doorways, not destinations.
//! Once DWELL is applied it holds for as long as STILL does, however young
//! the episode. JUST_STARTED_DWELL is therefore only entered from a cold
//! start, where the controller begins. This rule is asymmetric and is kept
//! exactly as tuned; see the `pinned_` tests below.

use core::fmt;
use core::str::FromStr;

use crate::belief::MobilityState;
use crate::constants::tracking::{
    DWELL_LOCATION_INTERVAL_MS, DWELL_SETTLE_MS, RELAXED_ACTIVITY_INTERVAL_MS,
    SETTLED_FASTEST_INTERVAL_MS, TRANSITIONAL_ACTIVITY_INTERVAL_MS,
    TRANSITIONAL_FASTEST_INTERVAL_MS, VEHICLE_LOCATION_INTERVAL_MS, VEHICLE_MIN_DISPLACEMENT_M,
    VEHICLE_SETTLE_MS, WALKING_ACTIVITY_INTERVAL_MS, WALKING_LOCATION_INTERVAL_MS,
    WALKING_SETTLE_MS,
};
use crate::errors::MobilityError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Location accuracy requested from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LocationPriority {
    HighAccuracy,
    BalancedPowerAccuracy,
}

/// Sampling configuration handed to the sensor-provisioning collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorRequest {
    pub priority: LocationPriority,
    /// Minimum displacement between location fixes (m)
    pub min_displacement_m: f32,
    pub fastest_interval_ms: u64,
    pub steady_interval_ms: u64,
    pub activity_interval_ms: u64,
}

/// Sensor-sampling mode selected by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[repr(u8)]
pub enum TrackingMode {
    JustStartedDwell = 0,
    Dwell = 1,
    JustStartedWalking = 2,
    Walking = 3,
    JustStartedVehicle = 4,
    Vehicle = 5,
}

const fn transitional(min_displacement_m: f32, steady_interval_ms: u64) -> SensorRequest {
    SensorRequest {
        priority: LocationPriority::HighAccuracy,
        min_displacement_m,
        fastest_interval_ms: TRANSITIONAL_FASTEST_INTERVAL_MS,
        steady_interval_ms,
        activity_interval_ms: TRANSITIONAL_ACTIVITY_INTERVAL_MS,
    }
}

/// Indexed by `TrackingMode as usize`
const MODE_REQUESTS: [SensorRequest; 6] = [
    transitional(0.0, 10 * 1000),
    SensorRequest {
        priority: LocationPriority::BalancedPowerAccuracy,
        min_displacement_m: 0.0,
        fastest_interval_ms: SETTLED_FASTEST_INTERVAL_MS,
        steady_interval_ms: DWELL_LOCATION_INTERVAL_MS,
        activity_interval_ms: RELAXED_ACTIVITY_INTERVAL_MS,
    },
    transitional(0.0, 5 * 1000),
    SensorRequest {
        priority: LocationPriority::HighAccuracy,
        min_displacement_m: 0.0,
        fastest_interval_ms: SETTLED_FASTEST_INTERVAL_MS,
        steady_interval_ms: WALKING_LOCATION_INTERVAL_MS,
        activity_interval_ms: WALKING_ACTIVITY_INTERVAL_MS,
    },
    transitional(20.0, 30 * 1000),
    SensorRequest {
        priority: LocationPriority::HighAccuracy,
        min_displacement_m: VEHICLE_MIN_DISPLACEMENT_M,
        fastest_interval_ms: SETTLED_FASTEST_INTERVAL_MS,
        steady_interval_ms: VEHICLE_LOCATION_INTERVAL_MS,
        activity_interval_ms: RELAXED_ACTIVITY_INTERVAL_MS,
    },
];

impl TrackingMode {
    pub const ALL: [Self; 6] = [
        Self::JustStartedDwell,
        Self::Dwell,
        Self::JustStartedWalking,
        Self::Walking,
        Self::JustStartedVehicle,
        Self::Vehicle,
    ];

    /// Persisted name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::JustStartedDwell => "JUST_STARTED_DWELL",
            Self::Dwell => "DWELL",
            Self::JustStartedWalking => "JUST_STARTED_WALKING",
            Self::Walking => "WALKING",
            Self::JustStartedVehicle => "JUST_STARTED_VEHICLE",
            Self::Vehicle => "VEHICLE",
        }
    }

    /// Sampling configuration for this mode
    pub const fn request(&self) -> SensorRequest {
        MODE_REQUESTS[*self as usize]
    }

    /// Dwell a transitional mode must exceed before its settled twin applies
    pub const fn settle_threshold_ms(&self) -> u64 {
        match self {
            Self::JustStartedDwell | Self::Dwell => DWELL_SETTLE_MS,
            Self::JustStartedWalking | Self::Walking => WALKING_SETTLE_MS,
            Self::JustStartedVehicle | Self::Vehicle => VEHICLE_SETTLE_MS,
        }
    }

    pub const fn is_transitional(&self) -> bool {
        matches!(self, Self::JustStartedDwell | Self::JustStartedWalking | Self::JustStartedVehicle)
    }
}

impl fmt::Display for TrackingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TrackingMode {
    type Err = MobilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|mode| mode.name() == s)
            .ok_or(MobilityError::UnknownTrackingMode)
    }
}

/// Mode transition function
///
/// `dwell_ms` is the time spent in `state` so far.
pub fn next_mode(state: MobilityState, dwell_ms: u64, previous: TrackingMode) -> TrackingMode {
    match state {
        MobilityState::Still => {
            if dwell_ms > DWELL_SETTLE_MS || previous != TrackingMode::JustStartedDwell {
                TrackingMode::Dwell
            } else {
                TrackingMode::JustStartedDwell
            }
        }
        MobilityState::Walking | MobilityState::Running | MobilityState::Bicycle => {
            if dwell_ms > WALKING_SETTLE_MS {
                TrackingMode::Walking
            } else {
                TrackingMode::JustStartedWalking
            }
        }
        MobilityState::Vehicle => {
            if dwell_ms > VEHICLE_SETTLE_MS {
                TrackingMode::Vehicle
            } else {
                TrackingMode::JustStartedVehicle
            }
        }
    }
}

/// Outcome of one controller evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeDecision {
    pub mode: TrackingMode,
    /// Differs from the mode before this evaluation
    pub changed: bool,
    /// Request to hand to the sensor collaborator, if any
    pub request: Option<SensorRequest>,
}

/// Holds the applied mode and decides when a request must be re-sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingModeController {
    mode: TrackingMode,
}

/// A cold start has no established dwell yet
impl Default for TrackingModeController {
    fn default() -> Self {
        Self::new(TrackingMode::JustStartedDwell)
    }
}

impl TrackingModeController {
    pub fn new(mode: TrackingMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> TrackingMode {
        self.mode
    }

    /// Re-evaluate after a classification
    ///
    /// A request is produced only when the mode changes.
    pub fn evaluate(&mut self, state: MobilityState, dwell_ms: u64) -> ModeDecision {
        self.decide(state, dwell_ms, false)
    }

    /// Re-evaluate on a keep-alive tick
    ///
    /// Always produces a request, since the previous one may have expired on
    /// the provider side.
    pub fn keep_alive(&mut self, state: MobilityState, dwell_ms: u64) -> ModeDecision {
        self.decide(state, dwell_ms, true)
    }

    fn decide(&mut self, state: MobilityState, dwell_ms: u64, force: bool) -> ModeDecision {
        let previous = self.mode;
        let mode = next_mode(state, dwell_ms, previous);
        let changed = mode != previous;
        self.mode = mode;

        if changed {
            log_info!("tracking mode {} -> {} ({} for {} ms)", previous, mode, state, dwell_ms);
        }

        ModeDecision {
            mode,
            changed,
            request: (changed || force).then(|| mode.request()),
        }
    }
}
