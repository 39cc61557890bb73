use std::time::Duration;

use parking_lot::Mutex;

use moodring_core::config::ScheduleSettings;
use moodring_core::limits::{FetchError, RateLimitSource, RateSnapshot};

/// Simulated request latency
const DEMO_LATENCY: Duration = Duration::from_millis(250);

/// Total tokens in the demo bucket
const DEMO_TOTAL: u64 = 6;

/// Demo window (2h)
const DEMO_WINDOW_SECS: u64 = 7200;

fn step(remaining: u64, low: u64, high: u64) -> RateSnapshot {
    RateSnapshot {
        remaining_tokens: remaining,
        total_tokens: DEMO_TOTAL,
        window_seconds: DEMO_WINDOW_SECS,
        low_effort_wait_seconds: low,
        high_effort_wait_seconds: high,
    }
}

/// Build the default demo script: drain the bucket, hit the limit, wait it
/// out, see the reset time go unknown, then refill.
pub fn default_script() -> Vec<RateSnapshot> {
    vec![
        step(6, 0, 0),
        step(5, 0, 0),
        step(3, 40, 0),
        step(1, 25, 90),
        step(0, 6, 12),
        step(0, 0, 0),
        step(6, 0, 0),
    ]
}

/// Timing that makes the script play out in under a minute
pub fn demo_schedule() -> ScheduleSettings {
    ScheduleSettings {
        tick_ms: 1000,
        resync_interval_secs: 8,
        activity_delay_ms: 500,
        zero_poll_cooldown_secs: 2,
    }
}

/// Source that replays a script, one step per fetch, looping at the end
pub struct ScriptedSource {
    script: Vec<RateSnapshot>,
    position: Mutex<usize>,
    latency: Duration,
}

impl ScriptedSource {
    pub fn new(script: Vec<RateSnapshot>) -> Self {
        Self {
            script,
            position: Mutex::new(0),
            latency: DEMO_LATENCY,
        }
    }

    /// Remove the simulated latency
    pub fn without_latency(mut self) -> Self {
        self.latency = Duration::ZERO;
        self
    }
}

impl RateLimitSource for ScriptedSource {
    fn fetch(&self) -> Result<RateSnapshot, FetchError> {
        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }

        let mut position = self.position.lock();
        let snapshot = self
            .script
            .get(*position % self.script.len().max(1))
            .copied()
            .ok_or_else(|| FetchError::Parse("empty demo script".to_string()))?;
        *position += 1;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodring_core::engine::{classify, DisplayState};

    #[test]
    fn test_script_covers_every_state() {
        let states: Vec<DisplayState> = default_script().iter().map(classify).collect();
        assert!(states.contains(&DisplayState::Ready));
        assert!(states.contains(&DisplayState::Exhausted));
        assert!(states.contains(&DisplayState::Pending));
    }

    #[test]
    fn test_script_respects_capacity() {
        for snapshot in default_script() {
            assert!(snapshot.remaining_tokens <= snapshot.total_tokens);
        }
    }

    #[test]
    fn test_scripted_source_loops() {
        let source = ScriptedSource::new(vec![step(2, 0, 0), step(0, 5, 0)]).without_latency();
        assert_eq!(source.fetch().unwrap().remaining_tokens, 2);
        assert_eq!(source.fetch().unwrap().remaining_tokens, 0);
        assert_eq!(source.fetch().unwrap().remaining_tokens, 2);
    }

    #[test]
    fn test_empty_script_is_an_error() {
        let source = ScriptedSource::new(Vec::new()).without_latency();
        assert!(source.fetch().is_err());
    }
}
