//! Owned engine state: the latest snapshot, its derived display state, and
//! the bookkeeping for stale responses and zero-reached fetches.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;

use super::countdown::{remaining_secs, render_gauge, StatusView};
use super::derive::{derive, DisplayState, ResetClock};
use crate::config::CountdownMode;
use crate::limits::{FetchError, FetchErrorKind, RateSnapshot};

/// Shared engine type alias
pub type SharedEngine = Arc<RwLock<EngineState>>;

/// Result of one fetch, tagged with the sequence number it was issued with
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub seq: u64,
    pub result: Result<RateSnapshot, FetchError>,
}

/// What applying an outcome did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyResult {
    /// Snapshot replaced
    Updated {
        previous: Option<DisplayState>,
        state: DisplayState,
        /// Ready with no low-effort wait: the host UI should be nudged
        nudge: bool,
    },
    /// Error indicator set, snapshot untouched
    Failed(FetchErrorKind),
    /// Older than what is already applied; ignored
    Stale,
}

#[derive(Debug, Clone)]
struct Current {
    snapshot: RateSnapshot,
    state: DisplayState,
    clock: ResetClock,
    fetched_at: DateTime<Utc>,
}

/// Engine state
#[derive(Debug)]
pub struct EngineState {
    current: Option<Current>,
    error: Option<FetchError>,
    /// Last sequence number handed out
    issued_seq: u64,
    /// Sequence number of the last outcome applied
    applied_seq: u64,
    /// Whether the zero-reached trigger may fire
    zero_armed: bool,
    last_zero_fetch: Option<DateTime<Utc>>,
    zero_cooldown: TimeDelta,
}

impl EngineState {
    /// Create a new engine state
    pub fn new(zero_cooldown: std::time::Duration) -> Self {
        Self {
            current: None,
            error: None,
            issued_seq: 0,
            applied_seq: 0,
            zero_armed: false,
            last_zero_fetch: None,
            zero_cooldown: TimeDelta::from_std(zero_cooldown).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Create shared state
    pub fn shared(zero_cooldown: std::time::Duration) -> SharedEngine {
        Arc::new(RwLock::new(Self::new(zero_cooldown)))
    }

    /// Hand out the sequence number for a fetch about to be issued
    pub fn issue_seq(&mut self) -> u64 {
        self.issued_seq += 1;
        self.issued_seq
    }

    pub fn snapshot(&self) -> Option<&RateSnapshot> {
        self.current.as_ref().map(|c| &c.snapshot)
    }

    pub fn display_state(&self) -> Option<DisplayState> {
        self.current.as_ref().map(|c| c.state)
    }

    pub fn clock(&self) -> Option<&ResetClock> {
        self.current.as_ref().map(|c| &c.clock)
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// Apply a fetch outcome received at `now`.
    ///
    /// Outcomes issued before the last applied one are dropped, so a slow
    /// response can never overwrite a newer one.
    pub fn apply(&mut self, outcome: FetchOutcome, now: DateTime<Utc>) -> ApplyResult {
        if outcome.seq < self.applied_seq {
            return ApplyResult::Stale;
        }
        self.applied_seq = outcome.seq;

        match outcome.result {
            Ok(snapshot) => {
                let previous = self.display_state();
                let (state, clock) = derive(&snapshot, now);
                self.current = Some(Current {
                    snapshot,
                    state,
                    clock,
                    fetched_at: now,
                });
                self.error = None;
                self.zero_armed = true;
                // Cooldown only throttles retries after a failure
                self.last_zero_fetch = None;

                ApplyResult::Updated {
                    previous,
                    state,
                    nudge: state == DisplayState::Ready && snapshot.low_effort_wait_seconds == 0,
                }
            }
            Err(err) => {
                let kind = err.kind();
                self.error = Some(err);
                // Retry through the zero trigger, still subject to the cooldown
                self.zero_armed = true;
                ApplyResult::Failed(kind)
            }
        }
    }

    /// Check the zero-reached trigger at `now`, disarming it when it fires.
    ///
    /// Fires when exhausted and both clocks read zero. It stays disarmed until
    /// the next outcome is applied.
    pub fn take_zero_trigger(&mut self, now: DateTime<Utc>) -> bool {
        let Some(current) = &self.current else {
            return false;
        };
        if !self.zero_armed || current.state != DisplayState::Exhausted {
            return false;
        }
        if remaining_secs(current.clock.low_reset_at, now) > 0
            || remaining_secs(current.clock.high_reset_at, now) > 0
        {
            return false;
        }
        if let Some(last) = self.last_zero_fetch {
            if now - last < self.zero_cooldown {
                return false;
            }
        }

        self.zero_armed = false;
        self.last_zero_fetch = Some(now);
        true
    }

    /// Build the view for `now`
    pub fn view(&self, now: DateTime<Utc>, mode: CountdownMode) -> StatusView {
        if let Some(err) = &self.error {
            return StatusView::Failed {
                error: err.kind(),
                detail: err.to_string(),
            };
        }
        match &self.current {
            Some(current) => StatusView::Gauge(render_gauge(
                &current.snapshot,
                current.state,
                &current.clock,
                mode,
                Some(current.fetched_at),
                now,
            )),
            None => StatusView::Loading,
        }
    }
}
