//! Belief convergence and tracking-mode scenarios driven through the engine

mod common;

use common::collaborators::start_tracker;
use common::generators::classifications;
use mobility_core::{
    ActivityLabel, BeliefModel, ClassificationSample, MemoryStore, MobilityEvent, MobilityState,
    MockTimeSource, TrackingMode,
};

fn mode_changes(requests: &[mobility_core::SensorRequest]) -> Vec<TrackingMode> {
    requests
        .iter()
        .filter_map(|r| TrackingMode::ALL.iter().copied().find(|m| m.request() == *r))
        .collect()
}

#[test]
fn still_stream_converges_from_prior() {
    let mut model = BeliefModel::new();
    let mut best = Vec::new();
    for sample in classifications(ActivityLabel::Still, 100, 0, 1_000, 60) {
        best.push(model.push(&sample));
    }

    assert!(model.probability(MobilityState::Still) >= 0.99);
    assert!(best.iter().skip(3).all(|&s| s == MobilityState::Still));
}

#[test]
fn single_noisy_sample_does_not_flip_a_settled_belief() {
    let mut model = BeliefModel::new();
    for sample in classifications(ActivityLabel::Still, 100, 0, 1_000, 30) {
        model.push(&sample);
    }

    let noise = ClassificationSample::new(30_000)
        .with(ActivityLabel::Walking, 40)
        .with(ActivityLabel::Still, 30)
        .with(ActivityLabel::Tilting, 30);
    assert_eq!(model.push(&noise), MobilityState::Still);
}

#[test]
fn walking_settles_exactly_once_after_threshold() {
    let mut store = MemoryStore::new();
    let clock = MockTimeSource::new(0);
    let mut tracker = start_tracker(&mut store, &clock).unwrap();

    let mut flips = Vec::new();
    let mut previous = tracker.mode();
    for sample in classifications(ActivityLabel::Walking, 100, 1_000, 1_000, 90) {
        let at = sample.timestamp;
        tracker.handle(MobilityEvent::Classification(sample)).unwrap();
        if tracker.mode() != previous {
            flips.push((previous, tracker.mode(), at));
            previous = tracker.mode();
        }
    }

    assert_eq!(
        flips,
        vec![
            (TrackingMode::JustStartedDwell, TrackingMode::JustStartedWalking, 1_000),
            (TrackingMode::JustStartedWalking, TrackingMode::Walking, 42_000),
        ]
    );

    // one request at cold start, one per change
    assert_eq!(
        mode_changes(&tracker.sensors().requests),
        vec![TrackingMode::JustStartedDwell, TrackingMode::JustStartedWalking, TrackingMode::Walking]
    );
}

#[test]
fn vehicle_settles_after_its_threshold() {
    let mut store = MemoryStore::new();
    let clock = MockTimeSource::new(0);
    let mut tracker = start_tracker(&mut store, &clock).unwrap();

    for sample in classifications(ActivityLabel::InVehicle, 100, 0, 10_000, 5) {
        tracker.handle(sample.into()).unwrap();
    }
    assert_eq!(tracker.mode(), TrackingMode::JustStartedVehicle);

    tracker
        .handle(ClassificationSample::single(50_001, ActivityLabel::InVehicle, 100).into())
        .unwrap();
    assert_eq!(tracker.mode(), TrackingMode::Vehicle);
}

#[test]
fn pinned_pause_after_walking_skips_just_started_dwell() {
    let mut store = MemoryStore::new();
    let clock = MockTimeSource::new(0);
    let mut tracker = start_tracker(&mut store, &clock).unwrap();

    for sample in classifications(ActivityLabel::Walking, 100, 0, 5_000, 12) {
        tracker.handle(sample.into()).unwrap();
    }
    assert_eq!(tracker.mode(), TrackingMode::Walking);
    let before_pause = tracker.sensors().requests.len();

    let mut modes = Vec::new();
    for sample in classifications(ActivityLabel::Still, 100, 60_000, 5_000, 30) {
        tracker.handle(sample.into()).unwrap();
        modes.push(tracker.mode());
    }
    assert_eq!(tracker.state(), MobilityState::Still);

    // the pause goes straight to DWELL and stays there
    assert!(modes.iter().all(|&m| m == TrackingMode::Dwell));
    assert_eq!(
        mode_changes(&tracker.sensors().requests[before_pause..]),
        vec![TrackingMode::Dwell]
    );
}

#[test]
fn fresh_start_settles_into_dwell_after_threshold() {
    let mut store = MemoryStore::new();
    let clock = MockTimeSource::new(0);
    let mut tracker = start_tracker(&mut store, &clock).unwrap();

    let mut modes = Vec::new();
    for sample in classifications(ActivityLabel::Still, 100, 10_000, 10_000, 15) {
        tracker.handle(sample.into()).unwrap();
        modes.push(tracker.mode());
    }

    // dwell is measured from the cold start at 0; 130 s is the first sample past 120 s
    assert!(modes[..12].iter().all(|&m| m == TrackingMode::JustStartedDwell));
    assert!(modes[12..].iter().all(|&m| m == TrackingMode::Dwell));
    assert_eq!(
        mode_changes(&tracker.sensors().requests),
        vec![TrackingMode::JustStartedDwell, TrackingMode::Dwell]
    );
}

#[test]
fn episodes_follow_state_changes() {
    let mut store = MemoryStore::new();
    let clock = MockTimeSource::new(0);
    let mut tracker = start_tracker(&mut store, &clock).unwrap();

    for sample in classifications(ActivityLabel::InVehicle, 100, 10_000, 10_000, 6) {
        tracker.handle(sample.into()).unwrap();
    }
    for sample in classifications(ActivityLabel::Still, 100, 70_000, 10_000, 6) {
        tracker.handle(sample.into()).unwrap();
    }

    let episodes = tracker.sink().episodes();
    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[0].state, MobilityState::Still);
    assert_eq!((episodes[0].start, episodes[0].end), (0, 10_000));
    assert_eq!(episodes[1].state, MobilityState::Vehicle);
    assert_eq!(episodes[1].start, 10_000);
    assert!(episodes[1].end >= 70_000);
}
