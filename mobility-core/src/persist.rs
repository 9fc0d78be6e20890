//! Persisted Controller State
//!
//! ## What Survives a Restart
//!
//! The process hosting the core can be killed at any time. The controller
//! persists just enough to resume:
//!
//! | Key                   | Type  | Meaning                              |
//! |-----------------------|-------|--------------------------------------|
//! | `belief.<STATE>` (×5) | float | belief vector                        |
//! | `state`               | text  | most probable state                  |
//! | `state_start`         | int   | when that state began (ms)           |
//! | `tracking_mode`       | text  | applied tracking mode                |
//! | `last_write`          | int   | time of this write (ms)              |
//!
//! The record is all-or-nothing. A missing key, a belief that is not a
//! probability distribution or a name that no longer parses makes the whole
//! record absent, never partially trusted.
//!
//! An open step-count session is persisted separately under `step_session.*`
//! so its count can be committed after an unexpected restart.
//!
//! ## Storage Collaborator
//!
//! [`StateStore`] is a small typed key/value interface. Writes are buffered
//! until [`StateStore::commit`], which the caller invokes once per logical
//! update.

use crate::belief::{BeliefVector, MobilityState};
use crate::errors::MobilityResult;
use crate::session::StepSession;
use crate::time::{elapsed_ms, Timestamp};
use crate::tracking::TrackingMode;

/// Keys used in the state store
pub mod keys {
    /// Belief entries, in `MobilityState::ALL` order
    pub const BELIEF: [&str; 5] = [
        "belief.STILL",
        "belief.WALKING",
        "belief.RUNNING",
        "belief.BICYCLE",
        "belief.VEHICLE",
    ];
    pub const STATE: &str = "state";
    pub const STATE_START: &str = "state_start";
    pub const TRACKING_MODE: &str = "tracking_mode";
    pub const LAST_WRITE: &str = "last_write";

    pub const SESSION_START: &str = "step_session.start";
    pub const SESSION_DEADLINE: &str = "step_session.deadline";
    pub const SESSION_LAST_STEP: &str = "step_session.last_step";
    pub const SESSION_STEPS: &str = "step_session.steps";

    pub(crate) const SESSION: [&str; 4] = [SESSION_START, SESSION_DEADLINE, SESSION_LAST_STEP, SESSION_STEPS];
}

/// Typed key/value persistence
pub trait StateStore {
    fn get_float(&self, key: &str) -> Option<f64>;
    fn get_int(&self, key: &str) -> Option<u64>;
    fn get_text(&self, key: &str) -> Option<&str>;

    fn put_float(&mut self, key: &str, value: f64);
    fn put_int(&mut self, key: &str, value: u64);
    fn put_text(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);

    /// Make buffered writes durable
    fn commit(&mut self) -> MobilityResult<()>;
}

impl<S: StateStore + ?Sized> StateStore for &mut S {
    fn get_float(&self, key: &str) -> Option<f64> {
        (**self).get_float(key)
    }

    fn get_int(&self, key: &str) -> Option<u64> {
        (**self).get_int(key)
    }

    fn get_text(&self, key: &str) -> Option<&str> {
        (**self).get_text(key)
    }

    fn put_float(&mut self, key: &str, value: f64) {
        (**self).put_float(key, value)
    }

    fn put_int(&mut self, key: &str, value: u64) {
        (**self).put_int(key, value)
    }

    fn put_text(&mut self, key: &str, value: &str) {
        (**self).put_text(key, value)
    }

    fn remove(&mut self, key: &str) {
        (**self).remove(key)
    }

    fn commit(&mut self) -> MobilityResult<()> {
        (**self).commit()
    }
}

/// Everything the controller needs to resume after a restart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerPersistentState {
    pub belief: BeliefVector,
    pub state: MobilityState,
    pub state_start: Timestamp,
    pub mode: TrackingMode,
    pub last_write: Timestamp,
}

impl ControllerPersistentState {
    /// Write every key; the caller commits
    pub fn write_to<S: StateStore + ?Sized>(&self, store: &mut S) {
        for (key, (_, probability)) in keys::BELIEF.iter().zip(self.belief.iter()) {
            store.put_float(key, probability);
        }
        store.put_text(keys::STATE, self.state.name());
        store.put_int(keys::STATE_START, self.state_start);
        store.put_text(keys::TRACKING_MODE, self.mode.name());
        store.put_int(keys::LAST_WRITE, self.last_write);
    }

    /// Read a complete record, or nothing
    pub fn read_from<S: StateStore + ?Sized>(store: &S) -> Option<Self> {
        let last_write = store.get_int(keys::LAST_WRITE);
        let probabilities: heapless::Vec<(MobilityState, f64), 5> = MobilityState::ALL
            .iter()
            .zip(keys::BELIEF.iter())
            .filter_map(|(&state, key)| store.get_float(key).map(|p| (state, p)))
            .collect();

        if last_write.is_none() && probabilities.is_empty() {
            log_info!("no persisted controller state");
            return None;
        }

        let belief = match BeliefVector::from_probabilities(&probabilities) {
            Ok(belief) => belief,
            Err(e) => {
                log_warn!("discarding persisted state: {}", e);
                return None;
            }
        };

        let record = (|| {
            Some(Self {
                belief,
                state: store.get_text(keys::STATE)?.parse().ok()?,
                state_start: store.get_int(keys::STATE_START)?,
                mode: store.get_text(keys::TRACKING_MODE)?.parse().ok()?,
                last_write: last_write?,
            })
        })();

        if record.is_none() {
            log_warn!("discarding incomplete persisted state");
        }
        record
    }

    /// Whether more than `expiration_ms` passed between the last write and `now`
    pub fn is_stale(&self, now: Timestamp, expiration_ms: u64) -> bool {
        elapsed_ms(self.last_write, now) > expiration_ms
    }
}

/// Persist the open step session; the caller commits
pub fn write_step_session<S: StateStore + ?Sized>(store: &mut S, session: &StepSession) {
    store.put_int(keys::SESSION_START, session.start);
    store.put_int(keys::SESSION_DEADLINE, session.deadline);
    store.put_int(keys::SESSION_LAST_STEP, session.last_step);
    store.put_int(keys::SESSION_STEPS, session.steps);
}

/// Read a persisted step session, all fields or nothing
pub fn read_step_session<S: StateStore + ?Sized>(store: &S) -> Option<StepSession> {
    Some(StepSession {
        start: store.get_int(keys::SESSION_START)?,
        deadline: store.get_int(keys::SESSION_DEADLINE)?,
        last_step: store.get_int(keys::SESSION_LAST_STEP)?,
        steps: store.get_int(keys::SESSION_STEPS)?,
    })
}

/// Forget the persisted step session; the caller commits
pub fn clear_step_session<S: StateStore + ?Sized>(store: &mut S) {
    for key in keys::SESSION {
        store.remove(key);
    }
}

#[cfg(feature = "std")]
pub use memory::MemoryStore;

#[cfg(feature = "std")]
mod memory {
    use std::collections::HashMap;

    use super::StateStore;
    use crate::errors::MobilityResult;

    #[derive(Debug, Clone, PartialEq)]
    enum Value {
        Float(f64),
        Int(u64),
        Text(String),
    }

    /// In-process store, committed writes are visible immediately
    #[derive(Debug, Clone, Default)]
    pub struct MemoryStore {
        values: HashMap<String, Value>,
        commits: usize,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of `commit` calls so far
        pub fn commits(&self) -> usize {
            self.commits
        }

        pub fn contains(&self, key: &str) -> bool {
            self.values.contains_key(key)
        }

        pub fn is_empty(&self) -> bool {
            self.values.is_empty()
        }
    }

    impl StateStore for MemoryStore {
        fn get_float(&self, key: &str) -> Option<f64> {
            match self.values.get(key)? {
                Value::Float(v) => Some(*v),
                Value::Int(v) => Some(*v as f64),
                Value::Text(_) => None,
            }
        }

        fn get_int(&self, key: &str) -> Option<u64> {
            match self.values.get(key)? {
                Value::Int(v) => Some(*v),
                _ => None,
            }
        }

        fn get_text(&self, key: &str) -> Option<&str> {
            match self.values.get(key)? {
                Value::Text(v) => Some(v.as_str()),
                _ => None,
            }
        }

        fn put_float(&mut self, key: &str, value: f64) {
            self.values.insert(key.to_string(), Value::Float(value));
        }

        fn put_int(&mut self, key: &str, value: u64) {
            self.values.insert(key.to_string(), Value::Int(value));
        }

        fn put_text(&mut self, key: &str, value: &str) {
            self.values.insert(key.to_string(), Value::Text(value.to_string()));
        }

        fn remove(&mut self, key: &str) {
            self.values.remove(key);
        }

        fn commit(&mut self) -> MobilityResult<()> {
            self.commits += 1;
            Ok(())
        }
    }
}
