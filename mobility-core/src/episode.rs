//! Episodes: closed intervals attributed to one mobility state
//!
//! Only the open episode is held in memory. It is closed and handed to the
//! record sink when the best state changes, or at cold start when the
//! persisted episode turned out to be stale.

use crate::belief::MobilityState;
use crate::time::{elapsed_ms, Timestamp};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Episode {
    pub state: MobilityState,
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Episode {
    pub fn duration_ms(&self) -> u64 {
        elapsed_ms(self.start, self.end)
    }
}

/// The currently open episode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeTracker {
    state: MobilityState,
    start: Timestamp,
}

impl EpisodeTracker {
    pub fn new(state: MobilityState, start: Timestamp) -> Self {
        Self { state, start }
    }

    pub fn state(&self) -> MobilityState {
        self.state
    }

    /// When the open episode began
    pub fn start(&self) -> Timestamp {
        self.start
    }

    /// Time spent in the open episode at `now`
    pub fn dwell_ms(&self, now: Timestamp) -> u64 {
        elapsed_ms(self.start, now)
    }

    /// Record the best state at `at`
    ///
    /// On a state change the open episode is closed at `at`, returned, and
    /// the next one opens at `at`.
    pub fn observe(&mut self, state: MobilityState, at: Timestamp) -> Option<Episode> {
        if state == self.state {
            return None;
        }

        let closed = Episode {
            state: self.state,
            start: self.start,
            end: at,
        };
        log_info!("episode {} closed after {} ms, now {}", closed.state, closed.duration_ms(), state);

        self.state = state;
        self.start = at;
        Some(closed)
    }

    /// Close the open episode at the last time it was known to hold
    ///
    /// Used at cold start when persisted state is stale; the tracker itself is
    /// replaced by the caller afterwards.
    pub fn close_stale(&self, last_write: Timestamp) -> Episode {
        Episode {
            state: self.state,
            start: self.start,
            end: last_write.max(self.start),
        }
    }
}
