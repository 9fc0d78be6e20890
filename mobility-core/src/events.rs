//! Inbound Events, Outbound Records and Collaborator Seams
//!
//! ## Event Flow
//!
//! ```text
//!  accelerometer ──┐
//!  classifier ─────┼─► MobilityEvent ─► MobilityTracker::handle ─┬─► RecordSink       (Record)
//!  keep-alive tick ┘                                             ├─► SensorRequester  (SensorRequest, accel on/off)
//!                                                                └─► StateStore       (persisted state)
//! ```
//!
//! The host serializes delivery: one event is processed to completion
//! before the next is accepted. The accelerometer and classifier streams
//! are independent of each other, but each must arrive in its own order.
//!
//! Collaborator calls are synchronous and treated as atomic. A sink or
//! requester that can fail is expected to retry or report on its own side.

use crate::activity::ClassificationSample;
use crate::episode::Episode;
use crate::session::StepSummary;
use crate::step::{AccelSample, StepEvent};
use crate::tracking::SensorRequest;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One unit of work for the engine
#[derive(Debug, Clone, PartialEq)]
pub enum MobilityEvent {
    Accelerometer(AccelSample),
    Classification(ClassificationSample),
    /// Periodic host wake-up forcing re-application of the tracking mode
    KeepAlive,
}

impl From<AccelSample> for MobilityEvent {
    fn from(sample: AccelSample) -> Self {
        Self::Accelerometer(sample)
    }
}

impl From<ClassificationSample> for MobilityEvent {
    fn from(sample: ClassificationSample) -> Self {
        Self::Classification(sample)
    }
}

/// Data handed to the recording collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(tag = "type", rename_all = "snake_case"))]
pub enum Record {
    /// A closed mobility episode
    Episode(Episode),
    /// One detected step with the cumulative total
    Step(StepEvent),
    /// Steps counted over one finished step session
    StepSummary(StepSummary),
}

impl Record {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Episode(_) => "episode",
            Self::Step(_) => "step",
            Self::StepSummary(_) => "step_summary",
        }
    }
}

/// Receives episodes, steps and step summaries
pub trait RecordSink {
    fn record(&mut self, record: Record);
}

/// Applies sampling configurations and powers the accelerometer
pub trait SensorRequester {
    /// Register (or re-register) location and activity sampling
    fn apply(&mut self, request: &SensorRequest);

    /// Start or stop accelerometer delivery for step counting
    fn set_accelerometer(&mut self, enabled: bool);
}

impl<T: RecordSink + ?Sized> RecordSink for &mut T {
    fn record(&mut self, record: Record) {
        (**self).record(record)
    }
}

impl<T: SensorRequester + ?Sized> SensorRequester for &mut T {
    fn apply(&mut self, request: &SensorRequest) {
        (**self).apply(request)
    }

    fn set_accelerometer(&mut self, enabled: bool) {
        (**self).set_accelerometer(enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::belief::MobilityState;

    #[test]
    fn record_kinds() {
        let episode = Record::Episode(Episode { state: MobilityState::Still, start: 0, end: 1 });
        assert_eq!(episode.kind(), "episode");
        assert_eq!(Record::Step(StepEvent { time: 0, total_steps: 1 }).kind(), "step");
        assert_eq!(
            Record::StepSummary(StepSummary { start: 0, end: 1, steps: 2 }).kind(),
            "step_summary"
        );
    }

    #[test]
    fn samples_convert_into_events() {
        let event: MobilityEvent = AccelSample::new(5, 0.0, 0.0, 9.81).into();
        assert!(matches!(event, MobilityEvent::Accelerometer(s) if s.time == 5));
    }
}
