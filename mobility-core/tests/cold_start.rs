//! Cold start, staleness and persistence round trips

mod common;

use common::collaborators::start_tracker;
use common::generators::classifications;
use mobility_core::constants::STATE_EXPIRATION_MS;
use mobility_core::persist::keys;
use mobility_core::{
    ActivityLabel, BeliefVector, ControllerPersistentState, MemoryStore, MobilityEvent,
    MobilityState, MockTimeSource, Restoration, StateStore, TimeSource, TrackingMode,
};

/// Drive a tracker into a settled vehicle trip and drop it
fn drive(store: &mut MemoryStore, clock: &MockTimeSource) -> ControllerPersistentState {
    let mut tracker = start_tracker(store, clock).unwrap();
    for sample in classifications(ActivityLabel::InVehicle, 100, 10_000, 10_000, 8) {
        clock.set(sample.timestamp);
        tracker.handle(sample.into()).unwrap();
    }
    assert_eq!(tracker.mode(), TrackingMode::Vehicle);
    tracker.handle(MobilityEvent::KeepAlive).unwrap();
    tracker.snapshot(clock.now())
}

#[test]
fn stale_state_emits_exactly_one_episode() {
    let mut store = MemoryStore::new();
    let clock = MockTimeSource::new(0);
    let persisted = drive(&mut store, &clock);

    let restart = persisted.last_write + STATE_EXPIRATION_MS + 1;
    clock.set(restart);
    let tracker = start_tracker(&mut store, &clock).unwrap();

    assert_eq!(tracker.restoration(), Restoration::Expired);
    let episodes = tracker.sink().episodes();
    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].state, MobilityState::Vehicle);
    assert_eq!(episodes[0].start, persisted.state_start);
    assert_eq!(episodes[0].end, persisted.last_write);
    assert_eq!(tracker.sink().records.len(), 1);

    // fresh episode at the default prior, starting now
    assert_eq!(tracker.state(), MobilityState::Still);
    assert_eq!(tracker.episode_start(), restart);
    assert_eq!(*tracker.belief(), BeliefVector::prior());
    assert_eq!(tracker.mode(), TrackingMode::JustStartedDwell);
}

#[test]
fn state_at_the_expiration_boundary_is_resumed() {
    let mut store = MemoryStore::new();
    let clock = MockTimeSource::new(0);
    let persisted = drive(&mut store, &clock);

    clock.set(persisted.last_write + STATE_EXPIRATION_MS);
    let tracker = start_tracker(&mut store, &clock).unwrap();

    assert_eq!(tracker.restoration(), Restoration::Resumed);
    assert!(tracker.sink().records.is_empty());
    assert_eq!(tracker.state(), MobilityState::Vehicle);
    assert_eq!(tracker.mode(), TrackingMode::Vehicle);
}

#[test]
fn persisted_belief_round_trips() {
    let mut store = MemoryStore::new();
    let clock = MockTimeSource::new(0);
    let persisted = drive(&mut store, &clock);

    let restored = ControllerPersistentState::read_from(&store).unwrap();
    for (state, probability) in persisted.belief.iter() {
        assert!((restored.belief.get(state) - probability).abs() < 1e-12);
    }
    assert_eq!(restored, persisted);

    clock.advance(60_000);
    let tracker = start_tracker(&mut store, &clock).unwrap();
    assert_eq!(*tracker.belief(), persisted.belief);
    assert_eq!(tracker.episode_start(), persisted.state_start);
}

#[test]
fn incomplete_record_falls_back_to_the_prior() {
    let mut store = MemoryStore::new();
    let clock = MockTimeSource::new(0);
    drive(&mut store, &clock);
    store.remove(keys::BELIEF[MobilityState::Running.index()]);

    clock.advance(60_000);
    let tracker = start_tracker(&mut store, &clock).unwrap();

    assert_eq!(tracker.restoration(), Restoration::Absent);
    assert_eq!(*tracker.belief(), BeliefVector::prior());
    assert_eq!(tracker.state(), MobilityState::Still);
    assert!(tracker.sink().records.is_empty());
}

#[test]
fn zeroed_belief_falls_back_to_the_prior() {
    let mut store = MemoryStore::new();
    let clock = MockTimeSource::new(0);
    drive(&mut store, &clock);
    for key in keys::BELIEF {
        store.put_float(key, 0.0);
    }

    clock.advance(60_000);
    let mut tracker = start_tracker(&mut store, &clock).unwrap();
    assert_eq!(tracker.restoration(), Restoration::Absent);
    assert_eq!(*tracker.belief(), BeliefVector::prior());

    let start = clock.now();
    for sample in classifications(ActivityLabel::InVehicle, 100, start + 1_000, 1_000, 20) {
        tracker.handle(sample.into()).unwrap();
    }
    assert_eq!(tracker.state(), MobilityState::Vehicle);
    assert!(tracker.belief().iter().all(|(_, p)| p.is_finite()));
}

#[test]
fn mode_changes_and_keep_alives_are_persisted() {
    let mut store = MemoryStore::new();
    let clock = MockTimeSource::new(0);
    {
        let mut tracker = start_tracker(&mut store, &clock).unwrap();
        tracker
            .handle(mobility_core::ClassificationSample::single(5_000, ActivityLabel::Walking, 100).into())
            .unwrap();
    }
    let after_change = ControllerPersistentState::read_from(&store).unwrap();
    assert_eq!(after_change.mode, TrackingMode::JustStartedWalking);
    assert_eq!(after_change.last_write, 5_000);

    let commits = store.commits();
    clock.set(900_000);
    {
        let mut tracker = start_tracker(&mut store, &clock).unwrap();
        tracker.handle(MobilityEvent::KeepAlive).unwrap();
    }
    // once at cold start, once for the keep-alive
    assert_eq!(store.commits(), commits + 2);
    assert_eq!(store.get_int(keys::LAST_WRITE), Some(900_000));
}
