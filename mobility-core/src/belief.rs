//! Activity Belief Model (Discrete HMM Forward Filter)
//!
//! ## Overview
//!
//! The classifier is noisy and its samples arrive irregularly. A single
//! "walking 60%" in the middle of an hour at a desk should not flip the
//! tracking mode. This module keeps a probability distribution over the five
//! mobility states and updates it with one recursive Bayesian step per
//! classification.
//!
//! ## Filter Update
//!
//! ```text
//! score[to] = Σ_from belief[from] · T[from][to] · e[to]
//! belief'   = score / Σ score
//! best      = argmax score
//! ```
//!
//! `T` is the fixed [`TransitionMatrix`]; `e` is the [`EmissionEvidence`] of
//! the sample. Because every evidence entry is floored by a pseudo-count and
//! every transition entry is positive, every score is strictly positive and
//! no state can be locked out by one bad sample.
//!
//! The update is a pure function, [`update`]; [`BeliefModel`] only owns the
//! current vector and replaces it after each step.
//!
//! ## Usage Example
//!
//! ```rust
//! use mobility_core::{ActivityLabel, BeliefModel, ClassificationSample, MobilityState};
//!
//! let mut model = BeliefModel::new();
//! let sample = ClassificationSample::single(0, ActivityLabel::InVehicle, 100);
//! assert_eq!(model.push(&sample), MobilityState::Vehicle);
//! ```

use core::fmt;
use core::str::FromStr;

use crate::activity::ClassificationSample;
use crate::constants::belief::{BELIEF_SUM_TOLERANCE, DEFAULT_PRIOR, PSEUDO_COUNT, TRANSITION_TABLE};
use crate::errors::{MobilityError, MobilityResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Inferred mobility state, also the HMM hidden state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "SCREAMING_SNAKE_CASE"))]
#[repr(u8)]
pub enum MobilityState {
    Still = 0,
    Walking = 1,
    Running = 2,
    Bicycle = 3,
    Vehicle = 4,
}

impl MobilityState {
    pub const COUNT: usize = 5;

    /// Every state in table order
    pub const ALL: [Self; Self::COUNT] = [
        Self::Still,
        Self::Walking,
        Self::Running,
        Self::Bicycle,
        Self::Vehicle,
    ];

    /// Row/column of this state in every belief table
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Persisted name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Still => "STILL",
            Self::Walking => "WALKING",
            Self::Running => "RUNNING",
            Self::Bicycle => "BICYCLE",
            Self::Vehicle => "VEHICLE",
        }
    }

    /// WALKING or RUNNING, the states step counting runs in
    pub const fn is_on_foot(self) -> bool {
        matches!(self, Self::Walking | Self::Running)
    }
}

impl fmt::Display for MobilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MobilityState {
    type Err = MobilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|state| state.name() == s)
            .ok_or(MobilityError::UnknownState)
    }
}

/// Probability distribution over the five states
///
/// Entries are indexed by [`MobilityState::index`]. A vector built by this
/// module always sums to 1; one restored from storage must already be a
/// distribution and is then kept as written.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BeliefVector([f64; MobilityState::COUNT]);

impl Default for BeliefVector {
    fn default() -> Self {
        Self::prior()
    }
}

impl BeliefVector {
    /// STILL 0.80, every other state 0.05
    pub const fn prior() -> Self {
        Self(DEFAULT_PRIOR)
    }

    /// Build from (state, probability) pairs
    ///
    /// Fails with `IncompleteBelief` unless the slice holds exactly one entry
    /// for each of the five states, and with `InvalidBelief` when an entry is
    /// negative or non-finite or the entries do not sum to 1.
    pub fn from_probabilities(entries: &[(MobilityState, f64)]) -> MobilityResult<Self> {
        let mut values = [0.0; MobilityState::COUNT];
        let mut seen = [false; MobilityState::COUNT];

        for &(state, probability) in entries {
            values[state.index()] = probability;
            seen[state.index()] = true;
        }

        let distinct = seen.iter().filter(|s| **s).count();
        if distinct != MobilityState::COUNT || entries.len() != MobilityState::COUNT {
            return Err(MobilityError::IncompleteBelief { entries: distinct });
        }

        let sum: f64 = values.iter().sum();
        let in_range = values.iter().all(|p| p.is_finite() && *p >= 0.0);
        if !in_range || libm::fabs(sum - 1.0) > BELIEF_SUM_TOLERANCE {
            return Err(MobilityError::InvalidBelief);
        }
        Ok(Self(values))
    }

    pub fn get(&self, state: MobilityState) -> f64 {
        self.0[state.index()]
    }

    pub fn as_array(&self) -> &[f64; MobilityState::COUNT] {
        &self.0
    }

    /// (state, probability) pairs in table order
    pub fn iter(&self) -> impl Iterator<Item = (MobilityState, f64)> + '_ {
        MobilityState::ALL.iter().map(move |&s| (s, self.0[s.index()]))
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Highest-probability state, earlier states win ties
    pub fn most_probable(&self) -> MobilityState {
        argmax(&self.0)
    }
}

/// Normalized per-state weight of one classification sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionEvidence([f64; MobilityState::COUNT]);

impl EmissionEvidence {
    /// Credit each label's confidence to states, add the pseudo-count floor
    /// and normalize
    pub fn from_sample(sample: &ClassificationSample) -> Self {
        let mut weights = [PSEUDO_COUNT; MobilityState::COUNT];
        for lc in sample.iter() {
            let confidence = lc.confidence as f64;
            for (weight, credit) in weights.iter_mut().zip(lc.label.credit()) {
                *weight += confidence * credit;
            }
        }

        let total: f64 = weights.iter().sum();
        for weight in weights.iter_mut() {
            *weight /= total;
        }
        Self(weights)
    }

    pub fn get(&self, state: MobilityState) -> f64 {
        self.0[state.index()]
    }

    pub fn as_array(&self) -> &[f64; MobilityState::COUNT] {
        &self.0
    }
}

/// Shorthand for [`EmissionEvidence::from_sample`]
pub fn emission_evidence(sample: &ClassificationSample) -> EmissionEvidence {
    EmissionEvidence::from_sample(sample)
}

/// Fixed state transition probabilities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionMatrix {
    table: [[f64; MobilityState::COUNT]; MobilityState::COUNT],
}

impl Default for TransitionMatrix {
    fn default() -> Self {
        Self::standard()
    }
}

impl TransitionMatrix {
    /// The hand-tuned table from [`TRANSITION_TABLE`]
    pub const fn standard() -> Self {
        Self { table: TRANSITION_TABLE }
    }

    /// P(next = `to` | current = `from`)
    pub fn probability(&self, from: MobilityState, to: MobilityState) -> f64 {
        self.table[from.index()][to.index()]
    }

    pub fn row(&self, from: MobilityState) -> &[f64; MobilityState::COUNT] {
        &self.table[from.index()]
    }
}

/// One forward-filter step
///
/// Returns the normalized posterior and the state with the highest
/// unnormalized score. `belief` is left untouched.
pub fn update(
    belief: &BeliefVector,
    evidence: &EmissionEvidence,
    transitions: &TransitionMatrix,
) -> (BeliefVector, MobilityState) {
    let mut scores = [0.0; MobilityState::COUNT];

    for to in MobilityState::ALL {
        let predicted: f64 = MobilityState::ALL
            .iter()
            .map(|&from| belief.get(from) * transitions.probability(from, to))
            .sum();
        scores[to.index()] = predicted * evidence.get(to);
    }

    let best = argmax(&scores);
    let total: f64 = scores.iter().sum();
    for score in scores.iter_mut() {
        *score /= total;
    }

    (BeliefVector(scores), best)
}

fn argmax(values: &[f64; MobilityState::COUNT]) -> MobilityState {
    let mut best = 0;
    for i in 1..MobilityState::COUNT {
        if values[i] > values[best] {
            best = i;
        }
    }
    MobilityState::ALL[best]
}

/// Stateful wrapper around [`update`]
#[derive(Debug, Clone, PartialEq)]
pub struct BeliefModel {
    belief: BeliefVector,
    transitions: TransitionMatrix,
}

impl Default for BeliefModel {
    fn default() -> Self {
        Self::new()
    }
}

impl BeliefModel {
    /// Model at the default prior
    pub fn new() -> Self {
        Self::from_belief(BeliefVector::prior())
    }

    pub fn from_belief(belief: BeliefVector) -> Self {
        Self {
            belief,
            transitions: TransitionMatrix::standard(),
        }
    }

    /// Restore from (state, probability) pairs
    ///
    /// An incomplete set is rejected. Callers fall back to [`BeliefModel::new`].
    pub fn from_probabilities(entries: &[(MobilityState, f64)]) -> MobilityResult<Self> {
        BeliefVector::from_probabilities(entries).map(Self::from_belief)
    }

    /// Fold one classification into the belief and return the best state
    pub fn push(&mut self, sample: &ClassificationSample) -> MobilityState {
        self.push_evidence(&EmissionEvidence::from_sample(sample))
    }

    pub fn push_evidence(&mut self, evidence: &EmissionEvidence) -> MobilityState {
        let (belief, best) = update(&self.belief, evidence, &self.transitions);
        self.belief = belief;
        best
    }

    pub fn belief(&self) -> &BeliefVector {
        &self.belief
    }

    pub fn probability(&self, state: MobilityState) -> f64 {
        self.belief.get(state)
    }

    /// Back to the default prior
    pub fn reset(&mut self) {
        self.belief = BeliefVector::prior();
    }
}
