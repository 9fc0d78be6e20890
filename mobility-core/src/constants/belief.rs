//! Belief Model Constants
//!
//! Rows and columns of every table follow `MobilityState::ALL` order:
//! STILL, WALKING, RUNNING, BICYCLE, VEHICLE.

/// Pseudo-count added to every state's evidence before normalization.
///
/// Keeps every emission probability strictly positive so a single noisy
/// classification can never zero out a state forever.
pub const PSEUDO_COUNT: f64 = 5.0;

/// Prior used at first start and whenever persisted belief is unusable.
pub const DEFAULT_PRIOR: [f64; 5] = [0.80, 0.05, 0.05, 0.05, 0.05];

/// How far a restored belief may sum from 1 and still be trusted.
pub const BELIEF_SUM_TOLERANCE: f64 = 1e-6;

/// Share of TILTING confidence credited to STILL (1/9).
pub const TILTING_STILL_SHARE: f64 = 1.0 / 9.0;

/// Share of TILTING confidence credited to each motion state (2/9).
pub const TILTING_MOTION_SHARE: f64 = 2.0 / 9.0;

/// Transition probabilities `TRANSITION_TABLE[from][to]`.
///
/// STILL is the stickiest row. WALKING and RUNNING flow into each other
/// more readily than into anything else; BICYCLE is the least stable.
/// Each row sums to 1.
pub const TRANSITION_TABLE: [[f64; 5]; 5] = [
    //  STILL  WALK   RUN    BIKE   VEHICLE
    [0.90, 0.04, 0.02, 0.02, 0.02],  // STILL
    [0.05, 0.75, 0.10, 0.05, 0.05],  // WALKING
    [0.05, 0.10, 0.75, 0.05, 0.05],  // RUNNING
    [0.10, 0.10, 0.10, 0.65, 0.05],  // BICYCLE
    [0.05, 0.05, 0.05, 0.05, 0.80],  // VEHICLE
];
