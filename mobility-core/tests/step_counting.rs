//! Step counter scenarios over synthetic accelerometer streams

mod common;

use common::collaborators::start_tracker;
use common::generators::{resting, SineWalk};
use mobility_core::{
    ActivityLabel, ClassificationSample, MemoryStore, MobilityEvent, MockTimeSource, Record,
    StepCounter,
};

fn count(samples: &[mobility_core::AccelSample]) -> (u64, usize) {
    let mut counter = StepCounter::default();
    let mut events = 0;
    for sample in samples {
        if counter.process(sample).unwrap().is_some() {
            events += 1;
        }
    }
    (counter.step_count(), events)
}

#[test]
fn sine_walk_counts_one_step_per_cycle() {
    let walk = SineWalk::default();
    let (steps, events) = count(&walk.samples(0, 10.0));

    let cycles = walk.cycles(10.0);
    assert!((steps as f64 - cycles).abs() <= 1.0, "{} steps for {} cycles", steps, cycles);
    assert_eq!(steps as usize, events);
}

#[test]
fn sine_walk_is_stable_across_phase_and_amplitude() {
    for phase in [0.05, 0.1, 0.2, 0.3] {
        for amplitude in [3.5, 4.0, 4.5] {
            let walk = SineWalk::default().with_phase(phase).with_amplitude(amplitude);
            let (steps, _) = count(&walk.samples(0, 10.0));
            assert!(
                (steps as f64 - walk.cycles(10.0)).abs() <= 1.0,
                "phase {} amplitude {}: {} steps",
                phase,
                amplitude,
                steps
            );
        }
    }
}

#[test]
fn cadence_above_window_rate_is_capped() {
    // two cycles per second is faster than one 0.59 s window per step
    for rate in [50, 100, 200] {
        let walk = SineWalk::default().with_period(0.5).with_rate(rate).with_phase(0.0);
        let (steps, _) = count(&walk.samples(0, 10.0));
        assert!((16..=17).contains(&steps), "{} Hz: {} steps", rate, steps);
    }
}

#[test]
fn resting_device_counts_nothing() {
    for rate in [50, 100, 200] {
        let (steps, _) = count(&resting(0, 10.0, rate));
        assert_eq!(steps, 0);
    }
}

#[test]
fn step_events_carry_increasing_totals() {
    let mut counter = StepCounter::default();
    let mut totals = Vec::new();
    for sample in SineWalk::default().samples(0, 5.0) {
        if let Some(event) = counter.process(&sample).unwrap() {
            totals.push(event.total_steps);
        }
    }

    assert!(!totals.is_empty());
    assert!(totals.windows(2).all(|w| w[1] == w[0] + 1));
    assert_eq!(totals[0], 1);
}

#[test]
fn walking_session_summarizes_counted_steps() {
    let mut store = MemoryStore::new();
    let clock = MockTimeSource::new(0);
    let mut tracker = start_tracker(&mut store, &clock).unwrap();

    let walking = ClassificationSample::single(0, ActivityLabel::Walking, 100);
    tracker.handle(walking.into()).unwrap();
    assert!(tracker.sensors().accelerometer_on());

    // 10 s of walking inside the 30 s session
    for (i, sample) in SineWalk::default().samples(0, 10.0).into_iter().enumerate() {
        clock.set(i as u64 * 5);
        tracker.handle(MobilityEvent::Accelerometer(sample)).unwrap();
    }
    let counted = tracker.step_count();
    assert!(counted >= 14);
    assert_eq!(tracker.sink().steps() as u64, counted);

    clock.set(31_000);
    tracker.handle(MobilityEvent::KeepAlive).unwrap();
    assert!(!tracker.sensors().accelerometer_on());

    let summaries = tracker.sink().summaries();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].steps, counted);
    assert_eq!(summaries[0].start, 0);
    assert!(summaries[0].end <= 10_000);
}

#[test]
fn steps_are_recorded_without_a_session() {
    let mut store = MemoryStore::new();
    let clock = MockTimeSource::new(0);
    let mut tracker = start_tracker(&mut store, &clock).unwrap();

    for sample in SineWalk::default().samples(0, 3.0) {
        tracker.handle(sample.into()).unwrap();
    }

    assert!(tracker.step_count() > 0);
    assert!(tracker.sink().records.iter().all(|r| matches!(r, Record::Step(_))));
    assert!(tracker.sink().summaries().is_empty());
}
