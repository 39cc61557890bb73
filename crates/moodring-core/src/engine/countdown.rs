//! Per-tick countdown math and the view model handed to renderers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::derive::{DisplayState, ResetClock};
use crate::config::CountdownMode;
use crate::limits::{FetchErrorKind, RateSnapshot};

/// Exponent applied to the remaining/total ratio; below 1 so the gauge
/// drains faster at first, like a fuel tank
const FUEL_EXPONENT: f64 = 0.65;

/// Discrete gauge color band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelBand {
    /// >= 70%
    Full,
    /// >= 40%
    Mid,
    /// >= 10%
    Low,
    /// < 10% with tokens left
    Critical,
    /// No tokens left
    Depleted,
}

/// Whole seconds until `reset_at`, never negative. Unset clocks read 0.
pub fn remaining_secs(reset_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u64 {
    reset_at
        .map(|at| (at - now).num_seconds().max(0) as u64)
        .unwrap_or(0)
}

/// Non-linear fuel percentage, 0-100
pub fn fuel_percent(remaining_tokens: u64, total_tokens: u64) -> u8 {
    if total_tokens == 0 {
        return 0;
    }
    let ratio = (remaining_tokens as f64 / total_tokens as f64).clamp(0.0, 1.0);
    (ratio.powf(FUEL_EXPONENT) * 100.0).round() as u8
}

/// Band for a percentage; zero tokens always reads as depleted
pub fn fuel_band(percent: u8, remaining_tokens: u64) -> FuelBand {
    if remaining_tokens == 0 {
        FuelBand::Depleted
    } else if percent >= 70 {
        FuelBand::Full
    } else if percent >= 40 {
        FuelBand::Mid
    } else if percent >= 10 {
        FuelBand::Low
    } else {
        FuelBand::Critical
    }
}

/// "1h 2m 3s"
pub fn format_hms(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    format!("{}h {}m {}s", h, m, s)
}

/// Seconds shown in the exhausted headline
pub fn headline_reset_secs(mode: CountdownMode, low_secs: u64, high_secs: u64) -> u64 {
    match mode {
        CountdownMode::Strict => low_secs.max(high_secs),
        CountdownMode::LowEffort if low_secs > 0 => low_secs,
        CountdownMode::LowEffort => high_secs,
    }
}

/// Everything a renderer needs for one frame of the gauge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeView {
    pub state: DisplayState,
    pub mode: CountdownMode,
    pub remaining_tokens: u64,
    pub total_tokens: u64,
    pub window_hours: f64,
    pub fuel_percent: u8,
    pub band: FuelBand,
    pub low_remaining_secs: u64,
    pub high_remaining_secs: u64,
    pub headline: String,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl GaugeView {
    /// Plain text lines (no title), used by the one-shot status output
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Tokens: {}/{}", self.remaining_tokens, self.total_tokens),
            self.headline.clone(),
            format!(
                "Low: {}  High: {}",
                format_hms(self.low_remaining_secs),
                format_hms(self.high_remaining_secs)
            ),
            format!("Window: {}h", self.window_hours),
        ]
    }
}

/// What the display shows right now
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusView {
    /// No fetch has completed yet
    Loading,
    /// The most recent fetch failed
    Failed { error: FetchErrorKind, detail: String },
    /// Normal gauge display
    Gauge(GaugeView),
}

impl StatusView {
    pub fn gauge(&self) -> Option<&GaugeView> {
        match self {
            StatusView::Gauge(view) => Some(view),
            _ => None,
        }
    }
}

/// Build the gauge view for `now`. Pure; called once per tick.
pub fn render_gauge(
    snapshot: &RateSnapshot,
    state: DisplayState,
    clock: &ResetClock,
    mode: CountdownMode,
    fetched_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> GaugeView {
    let low_remaining_secs = remaining_secs(clock.low_reset_at, now);
    let high_remaining_secs = remaining_secs(clock.high_reset_at, now);
    let percent = fuel_percent(snapshot.remaining_tokens, snapshot.total_tokens);

    let headline = match state {
        DisplayState::Ready if low_remaining_secs > 0 => {
            format!("Next token: {}", format_hms(low_remaining_secs))
        }
        DisplayState::Ready => "Next token: Ready".to_string(),
        DisplayState::Exhausted => format!(
            "Resets in: {}",
            format_hms(headline_reset_secs(
                mode,
                low_remaining_secs,
                high_remaining_secs
            ))
        ),
        DisplayState::Pending => "Calculating wait time…".to_string(),
    };

    GaugeView {
        state,
        mode,
        remaining_tokens: snapshot.remaining_tokens,
        total_tokens: snapshot.total_tokens,
        window_hours: snapshot.window_hours(),
        fuel_percent: percent,
        band: fuel_band(percent, snapshot.remaining_tokens),
        low_remaining_secs,
        high_remaining_secs,
        headline,
        fetched_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::derive::derive;
    use chrono::TimeDelta;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_remaining_secs_never_negative() {
        let now = Utc::now();
        assert_eq!(remaining_secs(None, now), 0);
        assert_eq!(remaining_secs(Some(now - TimeDelta::seconds(90)), now), 0);
        assert_eq!(remaining_secs(Some(now - TimeDelta::milliseconds(400)), now), 0);
        assert_eq!(remaining_secs(Some(now), now), 0);
    }

    #[test]
    fn test_remaining_secs_floors() {
        let now = Utc::now();
        assert_eq!(remaining_secs(Some(now + TimeDelta::milliseconds(1999)), now), 1);
        assert_eq!(remaining_secs(Some(now + TimeDelta::seconds(120)), now), 120);
    }

    #[test]
    fn test_fuel_percent_values() {
        assert_eq!(fuel_percent(5, 10), 64);
        assert_eq!(fuel_percent(10, 10), 100);
        assert_eq!(fuel_percent(0, 10), 0);
        assert_eq!(fuel_percent(1, 10), 22);
        assert_eq!(fuel_percent(0, 0), 0);
        assert_eq!(fuel_percent(3, 0), 0);
    }

    #[test]
    fn test_fuel_percent_monotonic() {
        for total in [1u64, 7, 10, 25, 100, 1000] {
            let mut previous = 0;
            for remaining in 0..=total {
                let pct = fuel_percent(remaining, total);
                assert!(pct >= previous, "{}/{} dropped to {}", remaining, total, pct);
                previous = pct;
            }
        }
    }

    #[test]
    fn test_fuel_band_thresholds() {
        assert_eq!(fuel_band(100, 10), FuelBand::Full);
        assert_eq!(fuel_band(70, 7), FuelBand::Full);
        assert_eq!(fuel_band(69, 6), FuelBand::Mid);
        assert_eq!(fuel_band(40, 3), FuelBand::Mid);
        assert_eq!(fuel_band(39, 3), FuelBand::Low);
        assert_eq!(fuel_band(10, 1), FuelBand::Low);
        assert_eq!(fuel_band(9, 1), FuelBand::Critical);
        // Depleted wins even when the percentage would say otherwise
        assert_eq!(fuel_band(80, 0), FuelBand::Depleted);
        assert_eq!(fuel_band(0, 0), FuelBand::Depleted);
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0), "0h 0m 0s");
        assert_eq!(format_hms(120), "0h 2m 0s");
        assert_eq!(format_hms(3723), "1h 2m 3s");
        assert_eq!(format_hms(86_400), "24h 0m 0s");
    }

    #[test]
    fn test_headline_reset_secs_modes() {
        assert_eq!(headline_reset_secs(CountdownMode::Strict, 60, 600), 600);
        assert_eq!(headline_reset_secs(CountdownMode::LowEffort, 60, 600), 60);
        assert_eq!(headline_reset_secs(CountdownMode::LowEffort, 0, 600), 600);
    }

    #[test]
    fn test_half_full_scenario() {
        let now = Utc::now();
        let snapshot = RateSnapshot {
            remaining_tokens: 5,
            total_tokens: 10,
            window_seconds: 7200,
            low_effort_wait_seconds: 0,
            high_effort_wait_seconds: 0,
        };
        let (state, clock) = derive(&snapshot, now);
        let view = render_gauge(&snapshot, state, &clock, CountdownMode::Strict, None, now);

        assert_eq!(view.state, DisplayState::Ready);
        assert_eq!(view.fuel_percent, 64);
        assert_eq!(view.band, FuelBand::Mid);
        assert_eq!(view.headline, "Next token: Ready");
        assert_eq!(
            view.lines(),
            vec![
                "Tokens: 5/10".to_string(),
                "Next token: Ready".to_string(),
                "Low: 0h 0m 0s  High: 0h 0m 0s".to_string(),
                "Window: 2h".to_string(),
            ]
        );
    }

    #[test]
    fn test_exhausted_scenario_counts_down_locally() {
        let fetched = Utc::now();
        let snapshot = RateSnapshot {
            remaining_tokens: 0,
            total_tokens: 10,
            window_seconds: 7200,
            low_effort_wait_seconds: 120,
            high_effort_wait_seconds: 0,
        };
        let (state, clock) = derive(&snapshot, fetched);

        let at_fetch = render_gauge(&snapshot, state, &clock, CountdownMode::Strict, None, fetched);
        assert_eq!(at_fetch.state, DisplayState::Exhausted);
        assert_eq!(at_fetch.low_remaining_secs, 120);
        assert_eq!(at_fetch.high_remaining_secs, 0);
        assert_eq!(at_fetch.band, FuelBand::Depleted);
        assert_eq!(at_fetch.headline, "Resets in: 0h 2m 0s");

        let later = fetched + TimeDelta::seconds(45);
        let ticked = render_gauge(&snapshot, state, &clock, CountdownMode::Strict, None, later);
        assert_eq!(ticked.state, DisplayState::Exhausted);
        assert_eq!(ticked.low_remaining_secs, 75);

        let past = fetched + TimeDelta::seconds(500);
        let expired = render_gauge(&snapshot, state, &clock, CountdownMode::Strict, None, past);
        // Reaching zero does not leave the exhausted state
        assert_eq!(expired.state, DisplayState::Exhausted);
        assert_eq!(expired.low_remaining_secs, 0);
    }

    #[test]
    fn test_ready_shows_next_token_countdown() {
        let now = Utc::now();
        let snapshot = RateSnapshot {
            remaining_tokens: 2,
            total_tokens: 10,
            window_seconds: 7200,
            low_effort_wait_seconds: 3723,
            high_effort_wait_seconds: 0,
        };
        let (state, clock) = derive(&snapshot, now);
        let view = render_gauge(&snapshot, state, &clock, CountdownMode::LowEffort, None, now);
        assert_eq!(view.headline, "Next token: 1h 2m 3s");
    }

    #[test]
    fn test_status_view_json_is_tagged() {
        let json = serde_json::to_value(StatusView::Failed {
            error: FetchErrorKind::Parse,
            detail: "missing field".to_string(),
        })
        .unwrap();
        assert_eq!(json["kind"], "failed");
        assert_eq!(json["error"], "parse");
        assert_eq!(
            serde_json::to_value(StatusView::Loading).unwrap()["kind"],
            "loading"
        );
    }
}
