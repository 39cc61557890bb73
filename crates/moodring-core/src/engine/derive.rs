//! Classify a snapshot and pin its reset clocks to absolute times.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::limits::RateSnapshot;

/// What the gauge is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayState {
    /// Tokens available
    Ready,
    /// No tokens, and at least one effort level reports a known wait
    Exhausted,
    /// No tokens and no known wait yet
    Pending,
}

impl DisplayState {
    pub fn display_name(&self) -> &'static str {
        match self {
            DisplayState::Ready => "ready",
            DisplayState::Exhausted => "exhausted",
            DisplayState::Pending => "pending",
        }
    }
}

/// Absolute reset times captured at fetch time.
///
/// `None` means the wait was zero or unknown. The clock is never shifted
/// between fetches; only the remaining time to each instant is recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ResetClock {
    pub low_reset_at: Option<DateTime<Utc>>,
    pub high_reset_at: Option<DateTime<Utc>>,
}

/// Classify a snapshot.
///
/// Zero tokens with both waits at zero is `Pending`, not `Exhausted`: the
/// reset time is unknown, so there is nothing to count down to.
pub fn classify(snapshot: &RateSnapshot) -> DisplayState {
    if snapshot.remaining_tokens > 0 {
        DisplayState::Ready
    } else if snapshot.low_effort_wait_seconds > 0 || snapshot.high_effort_wait_seconds > 0 {
        DisplayState::Exhausted
    } else {
        DisplayState::Pending
    }
}

/// Derive the display state and reset clock for a snapshot fetched at `now`
pub fn derive(snapshot: &RateSnapshot, now: DateTime<Utc>) -> (DisplayState, ResetClock) {
    let clock = ResetClock {
        low_reset_at: reset_at(snapshot.low_effort_wait_seconds, now),
        high_reset_at: reset_at(snapshot.high_effort_wait_seconds, now),
    };
    (classify(snapshot), clock)
}

fn reset_at(wait_seconds: u64, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if wait_seconds == 0 {
        return None;
    }
    let wait = i64::try_from(wait_seconds)
        .ok()
        .and_then(TimeDelta::try_seconds)?;
    now.checked_add_signed(wait)
}
