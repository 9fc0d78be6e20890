//! Step-Count Sessions
//!
//! The accelerometer is only worth powering while the user is on foot.
//! Every WALKING or RUNNING inference opens a session, or pushes the open
//! session's deadline out to `now + run_ms`. Once an event arrives past the
//! deadline the session is closed and summarized.
//!
//! ```text
//!  WALKING        WALKING              (no on-foot inference)
//!     │              │                        │
//!     ▼              ▼                        ▼
//!  [start ───────── extend ──────── deadline]  close ─► StepSummary
//! ```

use crate::time::Timestamp;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Steps counted over one closed session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StepSummary {
    pub start: Timestamp,
    /// Time of the last counted step, or the start when none were counted
    pub end: Timestamp,
    pub steps: u64,
}

/// Progress of the open session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSession {
    pub start: Timestamp,
    pub deadline: Timestamp,
    pub last_step: Timestamp,
    pub steps: u64,
}

impl StepSession {
    pub fn summary(&self) -> StepSummary {
        StepSummary {
            start: self.start,
            end: self.last_step.max(self.start),
            steps: self.steps,
        }
    }
}

/// What a call to [`StepSessions::extend`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    Started,
    Extended,
}

/// Owns at most one open step-count session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSessions {
    run_ms: u64,
    open: Option<StepSession>,
}

impl StepSessions {
    pub fn new(run_ms: u64) -> Self {
        Self { run_ms, open: None }
    }

    pub fn current(&self) -> Option<&StepSession> {
        self.open.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Open a session at `now`, or move the open one's deadline
    pub fn extend(&mut self, now: Timestamp) -> SessionChange {
        let deadline = now.saturating_add(self.run_ms);
        match self.open.as_mut() {
            Some(session) => {
                session.deadline = session.deadline.max(deadline);
                SessionChange::Extended
            }
            None => {
                log_info!("step session started at {}", now);
                self.open = Some(StepSession {
                    start: now,
                    deadline,
                    last_step: now,
                    steps: 0,
                });
                SessionChange::Started
            }
        }
    }

    /// Count one step in the open session
    ///
    /// Steps outside a session are ignored and `None` is returned.
    pub fn record_step(&mut self, now: Timestamp) -> Option<&StepSession> {
        let session = self.open.as_mut()?;
        session.steps += 1;
        session.last_step = now;
        Some(&*session)
    }

    /// Close the open session if its deadline has passed
    pub fn close_if_expired(&mut self, now: Timestamp) -> Option<StepSummary> {
        let due = self.open.map_or(false, |session| now > session.deadline);
        if due {
            self.close()
        } else {
            None
        }
    }

    /// Close the open session regardless of its deadline
    pub fn close(&mut self) -> Option<StepSummary> {
        let summary = self.open.take()?.summary();
        log_info!("step session closed with {} steps", summary.steps);
        Some(summary)
    }
}
