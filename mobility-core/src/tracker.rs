//! Event-Driven Mobility Engine
//!
//! ## Overview
//!
//! [`MobilityTracker`] wires the belief model, the tracking-mode controller,
//! the episode tracker and the step counter to four collaborators:
//!
//! - [`StateStore`]: persisted controller state
//! - [`RecordSink`]: episodes, steps and step summaries
//! - [`SensorRequester`]: sampling configuration and accelerometer power
//! - [`TimeSource`]: wall clock for keep-alive ticks and cold start
//!
//! It holds no timers or threads. The host delivers [`MobilityEvent`]s one at
//! a time and each is processed to completion.
//!
//! ## Cold Start
//!
//! ```text
//!                      read persisted state once
//!                 ┌────────────┼──────────────┐
//!              absent        fresh          stale (> expiration)
//!                 │            │               │
//!           default prior   resume      emit stale episode,
//!                 │            │        then default prior
//!                 └────────────┴───────────────┘
//!                              │
//!                   apply mode request, persist
//! ```
//!
//! An unfinished step session left behind by a killed process is committed
//! as a summary before anything else.
//!
//! ## Persistence Points
//!
//! Controller state is written after every tracking-mode change, every
//! episode boundary and every keep-alive tick. Step-session progress is
//! written after every counted step.

use crate::activity::ClassificationSample;
use crate::belief::{BeliefModel, BeliefVector, MobilityState};
use crate::constants::tracking::{STATE_EXPIRATION_MS, STEP_SESSION_RUN_MS};
use crate::episode::EpisodeTracker;
use crate::errors::{MobilityError, MobilityResult};
use crate::events::{MobilityEvent, Record, RecordSink, SensorRequester};
use crate::persist::{
    clear_step_session, read_step_session, write_step_session, ControllerPersistentState,
    StateStore,
};
use crate::session::{SessionChange, StepSessions, StepSummary};
use crate::step::{AccelSample, StepCounter, StepCounterConfig};
use crate::time::{TimeSource, Timestamp};
use crate::tracking::{TrackingMode, TrackingModeController};

/// Engine tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// Persisted state older than this at cold start is treated as stale
    pub state_expiration_ms: u64,
    /// How long a step session runs past the last on-foot inference
    pub step_session_run_ms: u64,
    /// Re-send the current request on every keep-alive tick
    pub reapply_on_keep_alive: bool,
    pub step_counter: StepCounterConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            state_expiration_ms: STATE_EXPIRATION_MS,
            step_session_run_ms: STEP_SESSION_RUN_MS,
            reapply_on_keep_alive: true,
            step_counter: StepCounterConfig::default(),
        }
    }
}

impl TrackerConfig {
    pub fn with_state_expiration(mut self, ms: u64) -> Self {
        self.state_expiration_ms = ms;
        self
    }

    pub fn with_step_session_run(mut self, ms: u64) -> Self {
        self.step_session_run_ms = ms;
        self
    }

    pub fn with_reapply_on_keep_alive(mut self, reapply: bool) -> Self {
        self.reapply_on_keep_alive = reapply;
        self
    }

    pub fn with_step_counter(mut self, step_counter: StepCounterConfig) -> Self {
        self.step_counter = step_counter;
        self
    }
}

/// How cold start treated the persisted state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restoration {
    /// Nothing usable was persisted
    Absent,
    /// Persisted state was recent and has been resumed
    Resumed,
    /// Persisted state was stale; its episode was closed and the model reset
    Expired,
}

/// The mobility engine
pub struct MobilityTracker<S, R, Q, T> {
    config: TrackerConfig,
    store: S,
    sink: R,
    sensors: Q,
    clock: T,
    belief: BeliefModel,
    episode: EpisodeTracker,
    controller: TrackingModeController,
    steps: StepCounter,
    sessions: StepSessions,
    restoration: Restoration,
}

impl<S, R, Q, T> MobilityTracker<S, R, Q, T>
where
    S: StateStore,
    R: RecordSink,
    Q: SensorRequester,
    T: TimeSource,
{
    /// Cold start: read persisted state once, apply the staleness policy and
    /// register the resulting tracking mode
    pub fn start(config: TrackerConfig, store: S, sink: R, sensors: Q, clock: T) -> MobilityResult<Self> {
        let now = clock.now();
        let mut tracker = Self {
            config,
            store,
            sink,
            sensors,
            clock,
            belief: BeliefModel::new(),
            episode: EpisodeTracker::new(MobilityState::Still, now),
            controller: TrackingModeController::default(),
            steps: StepCounter::new(config.step_counter),
            sessions: StepSessions::new(config.step_session_run_ms),
            restoration: Restoration::Absent,
        };

        tracker.commit_previous_session()?;

        if let Some(persisted) = ControllerPersistentState::read_from(&tracker.store) {
            if persisted.is_stale(now, config.state_expiration_ms) {
                let stale = EpisodeTracker::new(persisted.state, persisted.state_start);
                let closed = stale.close_stale(persisted.last_write);
                log_info!(
                    "persisted state is {} ms old, closing stale {} episode",
                    now.saturating_sub(persisted.last_write),
                    closed.state
                );
                tracker.sink.record(Record::Episode(closed));
                tracker.restoration = Restoration::Expired;
            } else {
                log_info!("resuming {} in {} mode", persisted.state, persisted.mode);
                tracker.belief = BeliefModel::from_belief(persisted.belief);
                tracker.episode = EpisodeTracker::new(persisted.state, persisted.state_start);
                tracker.controller = TrackingModeController::new(persisted.mode);
                tracker.restoration = Restoration::Resumed;
            }
        }

        let request = tracker.controller.mode().request();
        tracker.sensors.apply(&request);
        tracker.persist(now)?;
        Ok(tracker)
    }

    /// Process one event to completion
    pub fn handle(&mut self, event: MobilityEvent) -> MobilityResult<()> {
        match event {
            MobilityEvent::Accelerometer(sample) => self.on_accelerometer(&sample),
            MobilityEvent::Classification(sample) => self.on_classification(&sample),
            MobilityEvent::KeepAlive => self.on_keep_alive(),
        }
    }

    /// Close any open step session and persist the current state
    pub fn stop(&mut self) -> MobilityResult<()> {
        let now = self.clock.now();
        if let Some(summary) = self.sessions.close() {
            self.finish_session(summary)?;
        }
        self.persist(now)
    }

    pub fn restoration(&self) -> Restoration {
        self.restoration
    }

    /// Most probable state of the open episode
    pub fn state(&self) -> MobilityState {
        self.episode.state()
    }

    pub fn episode_start(&self) -> Timestamp {
        self.episode.start()
    }

    pub fn belief(&self) -> &BeliefVector {
        self.belief.belief()
    }

    pub fn mode(&self) -> TrackingMode {
        self.controller.mode()
    }

    /// Steps counted since this tracker started
    pub fn step_count(&self) -> u64 {
        self.steps.step_count()
    }

    pub fn step_session_open(&self) -> bool {
        self.sessions.is_open()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    pub fn sensors(&self) -> &Q {
        &self.sensors
    }

    pub fn clock(&self) -> &T {
        &self.clock
    }

    /// State as it would be persisted at `now`
    pub fn snapshot(&self, now: Timestamp) -> ControllerPersistentState {
        ControllerPersistentState {
            belief: *self.belief.belief(),
            state: self.episode.state(),
            state_start: self.episode.start(),
            mode: self.controller.mode(),
            last_write: now,
        }
    }

    fn on_accelerometer(&mut self, sample: &AccelSample) -> MobilityResult<()> {
        let now = self.clock.now();
        self.close_expired_session(now)?;

        let step = match self.steps.process(sample) {
            Ok(step) => step,
            Err(MobilityError::InvalidSample) => return Ok(()),
            Err(e) => return Err(e),
        };

        if let Some(step) = step {
            self.sink.record(Record::Step(step));
            if let Some(session) = self.sessions.record_step(now) {
                write_step_session(&mut self.store, session);
                self.commit()?;
            }
        }
        Ok(())
    }

    fn on_classification(&mut self, sample: &ClassificationSample) -> MobilityResult<()> {
        let at = sample.timestamp;
        self.close_expired_session(at)?;

        let best = self.belief.push(sample);
        let boundary = match self.episode.observe(best, at) {
            Some(closed) => {
                self.sink.record(Record::Episode(closed));
                true
            }
            None => false,
        };

        let decision = self.controller.evaluate(best, self.episode.dwell_ms(at));
        if let Some(request) = decision.request {
            self.sensors.apply(&request);
        }

        if best.is_on_foot() && self.sessions.extend(at) == SessionChange::Started {
            self.steps.reset_window();
            self.sensors.set_accelerometer(true);
        }

        if boundary || decision.changed {
            self.persist(at)?;
        }
        Ok(())
    }

    fn on_keep_alive(&mut self) -> MobilityResult<()> {
        let now = self.clock.now();
        self.close_expired_session(now)?;

        let state = self.episode.state();
        let decision = self.controller.keep_alive(state, self.episode.dwell_ms(now));
        if let Some(request) = decision.request {
            if decision.changed || self.config.reapply_on_keep_alive {
                log_debug!("keep-alive applying {} mode", decision.mode);
                self.sensors.apply(&request);
            }
        }
        self.persist(now)
    }

    fn close_expired_session(&mut self, now: Timestamp) -> MobilityResult<()> {
        match self.sessions.close_if_expired(now) {
            Some(summary) => self.finish_session(summary),
            None => Ok(()),
        }
    }

    fn finish_session(&mut self, summary: StepSummary) -> MobilityResult<()> {
        if summary.steps > 0 {
            self.sink.record(Record::StepSummary(summary));
        }
        self.sensors.set_accelerometer(false);
        clear_step_session(&mut self.store);
        self.commit()
    }

    /// Emit the count of a session interrupted by a restart
    fn commit_previous_session(&mut self) -> MobilityResult<()> {
        let Some(session) = read_step_session(&self.store) else {
            return Ok(());
        };

        let summary = session.summary();
        log_info!("committing {} steps from an interrupted session", summary.steps);
        if summary.steps > 0 {
            self.sink.record(Record::StepSummary(summary));
        }
        clear_step_session(&mut self.store);
        self.commit()
    }

    fn persist(&mut self, now: Timestamp) -> MobilityResult<()> {
        self.snapshot(now).write_to(&mut self.store);
        self.commit()
    }

    fn commit(&mut self) -> MobilityResult<()> {
        self.store.commit().map_err(|e| {
            log_error!("state store commit failed: {}", e);
            e
        })
    }
}
