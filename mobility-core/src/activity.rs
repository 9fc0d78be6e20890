//! Raw Activity Classifier Output
//!
//! The platform classifier reports, per sample, a handful of labels with
//! integer confidences (0-100). Its label set is wider than the five mobility
//! states the core reasons about, so each label carries a fixed credit row
//! saying how its confidence is shared among states:
//!
//! | Label        | STILL | WALKING | RUNNING | BICYCLE | VEHICLE |
//! |--------------|-------|---------|---------|---------|---------|
//! | `still`      | 1     |         |         |         |         |
//! | `walking`    |       | 1       |         |         |         |
//! | `running`    |       |         | 1       |         |         |
//! | `on_bicycle` |       |         |         | 1       |         |
//! | `in_vehicle` |       |         |         |         | 1       |
//! | `tilting`    | 1/9   | 2/9     | 2/9     | 2/9     | 2/9     |
//! | `on_foot`    |       |         |         |         |         |
//! | `unknown`    |       |         |         |         |         |
//!
//! `tilting` is reported while the device is being reoriented, which happens
//! both when picking a phone up from a desk and when moving with it, so its
//! confidence is spread. `on_foot` is the classifier's aggregate of walking
//! and running, which are reported on their own, so crediting it again would
//! double count. `unknown` carries no evidence.

use heapless::Vec;

use crate::belief::MobilityState;
use crate::constants::belief::{TILTING_MOTION_SHARE, TILTING_STILL_SHARE};
use crate::time::Timestamp;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum labels carried by one classification sample
pub const MAX_LABELS: usize = 8;

/// Labels produced by the platform activity classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum ActivityLabel {
    InVehicle = 0,
    OnBicycle = 1,
    OnFoot = 2,
    Running = 3,
    Still = 4,
    Tilting = 5,
    Unknown = 6,
    Walking = 7,
}

const M: f64 = TILTING_MOTION_SHARE;

/// Credit rows indexed by `ActivityLabel as usize`, columns in `MobilityState::ALL` order
const LABEL_CREDIT: [[f64; MobilityState::COUNT]; 8] = [
    [0.0, 0.0, 0.0, 0.0, 1.0],                  // in_vehicle
    [0.0, 0.0, 0.0, 1.0, 0.0],                  // on_bicycle
    [0.0, 0.0, 0.0, 0.0, 0.0],                  // on_foot
    [0.0, 0.0, 1.0, 0.0, 0.0],                  // running
    [1.0, 0.0, 0.0, 0.0, 0.0],                  // still
    [TILTING_STILL_SHARE, M, M, M, M],          // tilting
    [0.0, 0.0, 0.0, 0.0, 0.0],                  // unknown
    [0.0, 1.0, 0.0, 0.0, 0.0],                  // walking
];

impl ActivityLabel {
    pub const ALL: [Self; 8] = [
        Self::InVehicle,
        Self::OnBicycle,
        Self::OnFoot,
        Self::Running,
        Self::Still,
        Self::Tilting,
        Self::Unknown,
        Self::Walking,
    ];

    /// Wire name used by the classifier and in uploaded records
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InVehicle => "in_vehicle",
            Self::OnBicycle => "on_bicycle",
            Self::OnFoot => "on_foot",
            Self::Running => "running",
            Self::Still => "still",
            Self::Tilting => "tilting",
            Self::Unknown => "unknown",
            Self::Walking => "walking",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|label| label.name() == name)
    }

    /// Fraction of this label's confidence credited to each mobility state
    pub const fn credit(&self) -> &'static [f64; MobilityState::COUNT] {
        &LABEL_CREDIT[*self as usize]
    }
}

/// One (label, confidence) pair from a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LabelConfidence {
    pub label: ActivityLabel,
    /// Classifier confidence, 0-100
    pub confidence: u8,
}

/// One classifier result: ordered label confidences at a point in time
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassificationSample {
    /// When the classifier produced the result (ms)
    pub timestamp: Timestamp,
    confidences: Vec<LabelConfidence, MAX_LABELS>,
}

impl ClassificationSample {
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            confidences: Vec::new(),
        }
    }

    /// Sample with a single label, the common case in tests and replays
    pub fn single(timestamp: Timestamp, label: ActivityLabel, confidence: u8) -> Self {
        Self::new(timestamp).with(label, confidence)
    }

    /// Builder form of [`push`](Self::push)
    pub fn with(mut self, label: ActivityLabel, confidence: u8) -> Self {
        self.push(label, confidence);
        self
    }

    /// Append a label confidence
    ///
    /// Returns false when the sample already holds `MAX_LABELS` entries; the
    /// extra entry is dropped.
    pub fn push(&mut self, label: ActivityLabel, confidence: u8) -> bool {
        let accepted = self.confidences.push(LabelConfidence { label, confidence }).is_ok();
        if !accepted {
            log_warn!("classification at {} has more than {} labels", self.timestamp, MAX_LABELS);
        }
        accepted
    }

    /// Append by wire name; unrecognized names are kept as `unknown`
    pub fn push_named(&mut self, name: &str, confidence: u8) -> bool {
        let label = ActivityLabel::from_name(name).unwrap_or_else(|| {
            log_warn!("unrecognized activity label {:?} treated as unknown", name);
            ActivityLabel::Unknown
        });
        self.push(label, confidence)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LabelConfidence> {
        self.confidences.iter()
    }

    pub fn len(&self) -> usize {
        self.confidences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.confidences.is_empty()
    }

    /// Highest-confidence label, first one wins ties
    pub fn most_probable(&self) -> Option<LabelConfidence> {
        self.confidences
            .iter()
            .copied()
            .fold(None, |best: Option<LabelConfidence>, lc| match best {
                Some(b) if b.confidence >= lc.confidence => Some(b),
                _ => Some(lc),
            })
    }
}
