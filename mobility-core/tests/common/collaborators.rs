//! Recording collaborators

use mobility_core::{
    Episode, MemoryStore, MobilityResult, MobilityTracker, MockTimeSource, Record, RecordSink,
    SensorRequest, SensorRequester, StepSummary, TrackerConfig,
};

/// Keeps every record in arrival order
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub records: Vec<Record>,
}

impl RecordingSink {
    pub fn episodes(&self) -> Vec<Episode> {
        self.records
            .iter()
            .filter_map(|r| match r {
                Record::Episode(e) => Some(*e),
                _ => None,
            })
            .collect()
    }

    pub fn summaries(&self) -> Vec<StepSummary> {
        self.records
            .iter()
            .filter_map(|r| match r {
                Record::StepSummary(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    pub fn steps(&self) -> usize {
        self.records.iter().filter(|r| matches!(r, Record::Step(_))).count()
    }
}

impl RecordSink for RecordingSink {
    fn record(&mut self, record: Record) {
        self.records.push(record);
    }
}

/// Keeps every request and accelerometer toggle
#[derive(Debug, Default)]
pub struct RecordingSensors {
    pub requests: Vec<SensorRequest>,
    pub accelerometer: Vec<bool>,
}

impl RecordingSensors {
    pub fn accelerometer_on(&self) -> bool {
        self.accelerometer.last().copied().unwrap_or(false)
    }
}

impl SensorRequester for RecordingSensors {
    fn apply(&mut self, request: &SensorRequest) {
        self.requests.push(*request);
    }

    fn set_accelerometer(&mut self, enabled: bool) {
        self.accelerometer.push(enabled);
    }
}

pub type TestTracker<'a> =
    MobilityTracker<&'a mut MemoryStore, RecordingSink, RecordingSensors, &'a MockTimeSource>;

/// Cold-start a tracker over borrowed store and clock
pub fn start_tracker<'a>(
    store: &'a mut MemoryStore,
    clock: &'a MockTimeSource,
) -> MobilityResult<TestTracker<'a>> {
    MobilityTracker::start(
        TrackerConfig::default(),
        store,
        RecordingSink::default(),
        RecordingSensors::default(),
        clock,
    )
}
