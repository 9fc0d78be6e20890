//! Error Types for Mobility Inference
//!
//! ## Design Philosophy
//!
//! The error system follows the same constraints as the rest of the core:
//!
//! 1. **Small Size**: Every variant is a few bytes. Errors travel through the
//!    per-sample hot path of the step counter.
//!
//! 2. **No Heap Allocation**: Messages are `&'static str` only.
//!
//! 3. **Copy Semantics**: Errors are `Copy` so they can be logged and returned
//!    without ownership juggling.
//!
//! ## Error Categories
//!
//! ### Contract Violations
//! These are caller bugs. The failing operation is aborted and nothing is
//! partially updated:
//! - `Overflow` / `Underflow`: ring accumulator misuse
//! - `DetectorNotStarted`: pushing into a peak detector with no open window
//! - `UnsetWindowStart`: opening a window at the "unset" sentinel time
//!
//! ### Data Quality
//! Recovered by the caller, usually by falling back to defaults:
//! - `IncompleteBelief`: restored belief is missing states
//! - `InvalidBelief`: restored belief is not a probability distribution
//! - `UnknownState` / `UnknownTrackingMode`: persisted names that do not parse
//! - `InvalidSample`: NaN or infinite accelerometer axis
//!
//! ### Collaborator Failures
//! - `Storage`: the persistence collaborator could not commit
//!
//! ## Example
//!
//! ```rust
//! use mobility_core::{BeliefModel, MobilityError, MobilityState};
//!
//! let partial = [(MobilityState::Still, 0.9), (MobilityState::Walking, 0.1)];
//! let model = match BeliefModel::from_probabilities(&partial) {
//!     Ok(model) => model,
//!     Err(MobilityError::IncompleteBelief { .. }) => BeliefModel::new(),
//!     Err(_) => unreachable!(),
//! };
//! assert_eq!(model.probability(MobilityState::Still), 0.80);
//! ```

use thiserror_no_std::Error;

/// Result type for mobility operations
pub type MobilityResult<T> = Result<T, MobilityError>;

/// Mobility errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MobilityError {
    /// Push into a ring accumulator that already holds `capacity` items
    #[error("Ring buffer overflow at capacity {capacity}")]
    Overflow {
        /// Fixed capacity of the accumulator
        capacity: usize,
    },

    /// Pop or peek on an empty ring accumulator
    #[error("Ring buffer underflow")]
    Underflow,

    /// Sample pushed into a peak detector before `start`
    #[error("Cannot push without starting the detector")]
    DetectorNotStarted,

    /// Detection window opened at the unset sentinel time
    #[error("Detection window cannot start at the unset sentinel time")]
    UnsetWindowStart,

    /// Belief map did not hold exactly one entry per mobility state
    #[error("Belief is incomplete: {entries} of 5 states present")]
    IncompleteBelief {
        /// Number of distinct states that were present
        entries: usize,
    },

    /// A persisted or parsed state name is not a mobility state
    /// Restored entries are negative, non-finite or do not sum to 1
    #[error("Belief is not a probability distribution")]
    InvalidBelief,

    #[error("Unknown mobility state name")]
    UnknownState,

    /// A persisted tracking mode name is not a tracking mode
    #[error("Unknown tracking mode name")]
    UnknownTrackingMode,

    /// Accelerometer sample contains NaN or infinity
    #[error("Invalid sample: not a finite number")]
    InvalidSample,

    /// Persistence collaborator failed to commit
    #[error("Storage failure: {reason}")]
    Storage {
        reason: &'static str,
    },
}

impl MobilityError {
    /// True for errors that signal a caller bug rather than bad input
    pub const fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::Overflow { .. }
                | Self::Underflow
                | Self::DetectorNotStarted
                | Self::UnsetWindowStart
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MobilityError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Overflow { capacity } =>
                defmt::write!(fmt, "Overflow at capacity {}", capacity),
            Self::Underflow =>
                defmt::write!(fmt, "Underflow"),
            Self::DetectorNotStarted =>
                defmt::write!(fmt, "Detector not started"),
            Self::UnsetWindowStart =>
                defmt::write!(fmt, "Window start unset"),
            Self::IncompleteBelief { entries } =>
                defmt::write!(fmt, "Belief has {} of 5 states", entries),
            Self::InvalidBelief =>
                defmt::write!(fmt, "Belief not a distribution"),
            Self::UnknownState =>
                defmt::write!(fmt, "Unknown state"),
            Self::UnknownTrackingMode =>
                defmt::write!(fmt, "Unknown tracking mode"),
            Self::InvalidSample =>
                defmt::write!(fmt, "Invalid sample"),
            Self::Storage { reason } =>
                defmt::write!(fmt, "Storage: {}", reason),
        }
    }
}
