//! Replay a short commute through the mobility engine
//!
//! Sits at a desk, walks to the car park while the accelerometer counts
//! steps, drives, then parks. Prints every record and every sensor request
//! the engine emits.
//!
//! ```bash
//! cargo run --example replay_walk
//! ```

use std::f64::consts::PI;

use mobility_core::time::NANOS_PER_SECOND;
use mobility_core::{
    AccelSample, ActivityLabel, ClassificationSample, MemoryStore, MobilityEvent, MobilityResult,
    MobilityTracker, MockTimeSource, Record, RecordSink, SensorRequest, SensorRequester,
    TrackerConfig,
};

struct PrintSink;

impl RecordSink for PrintSink {
    fn record(&mut self, record: Record) {
        match record {
            Record::Episode(e) => println!(
                "  episode   {:<8} {:>6.1} s .. {:>6.1} s",
                e.state,
                e.start as f64 / 1000.0,
                e.end as f64 / 1000.0
            ),
            Record::Step(s) if s.total_steps % 10 == 0 => println!("  steps     {}", s.total_steps),
            Record::Step(_) => {}
            Record::StepSummary(s) => println!("  session   {} steps", s.steps),
        }
    }
}

struct PrintSensors;

impl SensorRequester for PrintSensors {
    fn apply(&mut self, request: &SensorRequest) {
        println!(
            "  request   {:?}, every {} s, activity every {} s",
            request.priority,
            request.steady_interval_ms / 1000,
            request.activity_interval_ms / 1000
        );
    }

    fn set_accelerometer(&mut self, enabled: bool) {
        println!("  accel     {}", if enabled { "on" } else { "off" });
    }
}

fn main() -> MobilityResult<()> {
    let clock = MockTimeSource::new(0);
    let mut tracker = MobilityTracker::start(
        TrackerConfig::default(),
        MemoryStore::new(),
        PrintSink,
        PrintSensors,
        &clock,
    )?;

    let phases = [
        (ActivityLabel::Still, 180),
        (ActivityLabel::Walking, 60),
        (ActivityLabel::InVehicle, 300),
        (ActivityLabel::Still, 120),
    ];

    let mut now = 0;
    for (label, seconds) in phases {
        println!("{} for {} s", label.name(), seconds);
        for _ in 0..seconds / 5 {
            now += 5_000;
            clock.set(now);
            tracker.handle(ClassificationSample::single(now, label, 95).into())?;

            if label == ActivityLabel::Walking {
                for sample in stride(now, 5) {
                    tracker.handle(MobilityEvent::Accelerometer(sample))?;
                }
            }
        }
    }

    tracker.stop()?;
    println!("final mode {}, {} steps", tracker.mode(), tracker.step_count());
    Ok(())
}

/// Five seconds of 100 Hz walking, sensor time aligned with wall time
fn stride(wall_ms: u64, seconds: i64) -> Vec<AccelSample> {
    let rate = 100;
    let dt = NANOS_PER_SECOND / rate;
    let base = wall_ms as i64 * 1_000_000;
    (0..rate * seconds)
        .map(|i| {
            let t = i as f64 / rate as f64;
            let z = 9.81 + 4.0 * (2.0 * PI * t / 0.64).sin();
            AccelSample::new(base + i * dt, 0.0, 0.0, z as f32)
        })
        .collect()
}

