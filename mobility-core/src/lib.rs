//! Mobility inference and power-aware tracking for mobile sensing
//!
//! Infers what the user is doing (still, walking, running, cycling, in a
//! vehicle) from noisy classifier output, picks a sensor-sampling
//! configuration that matches, and counts steps from raw accelerometer
//! samples.
//!
//! Key constraints:
//! - `no_std` capable, no heap allocation on the sample path
//! - Single-threaded and event driven, no timers or background tasks
//! - All I/O delegated to collaborator traits
//!
//! ```rust
//! use mobility_core::{
//!     ActivityLabel, ClassificationSample, MemoryStore, MobilityEvent, MobilityTracker,
//!     MockTimeSource, Record, RecordSink, SensorRequest, SensorRequester, TrackerConfig,
//!     TrackingMode,
//! };
//!
//! struct Discard;
//!
//! impl RecordSink for Discard {
//!     fn record(&mut self, _record: Record) {}
//! }
//!
//! impl SensorRequester for Discard {
//!     fn apply(&mut self, _request: &SensorRequest) {}
//!     fn set_accelerometer(&mut self, _enabled: bool) {}
//! }
//!
//! let clock = MockTimeSource::new(0);
//! let mut tracker = MobilityTracker::start(
//!     TrackerConfig::default(),
//!     MemoryStore::new(),
//!     Discard,
//!     Discard,
//!     &clock,
//! )?;
//!
//! let sample = ClassificationSample::single(1_000, ActivityLabel::InVehicle, 100);
//! tracker.handle(MobilityEvent::Classification(sample))?;
//! assert_eq!(tracker.mode(), TrackingMode::JustStartedVehicle);
//! # Ok::<(), mobility_core::MobilityError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod macros;

pub mod activity;
pub mod belief;
pub mod buffer;
pub mod constants;
pub mod episode;
pub mod errors;
pub mod events;
pub mod peak;
pub mod persist;
pub mod session;
pub mod step;
pub mod time;
pub mod tracker;
pub mod tracking;

// Public API
pub use activity::{ActivityLabel, ClassificationSample, LabelConfidence};
pub use belief::{emission_evidence, update, BeliefModel, BeliefVector, EmissionEvidence, MobilityState, TransitionMatrix};
pub use episode::{Episode, EpisodeTracker};
pub use errors::{MobilityError, MobilityResult};
pub use events::{MobilityEvent, Record, RecordSink, SensorRequester};
pub use peak::{PeakDetector, PeakDetectorConfig};
pub use persist::{ControllerPersistentState, StateStore};
pub use session::{StepSession, StepSummary};
pub use step::{AccelSample, StepCounter, StepCounterConfig, StepEvent};
pub use time::{MockTimeSource, SampleTime, TimeSource, Timestamp};
pub use tracker::{MobilityTracker, Restoration, TrackerConfig};
pub use tracking::{next_mode, LocationPriority, SensorRequest, TrackingMode, TrackingModeController};

#[cfg(feature = "std")]
pub use persist::MemoryStore;
#[cfg(feature = "std")]
pub use time::SystemTime;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
