//! One-shot `status` subcommand: fetch once, print, exit.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use moodring_core::config::CountdownMode;
use moodring_core::engine::{EngineState, FetchOutcome, StatusView};
use moodring_core::limits::{fetch_once, FetchError, HttpFetcher, RateLimitSource, RateSnapshot};

use crate::config::Settings;

/// Fetch once from the configured endpoint and print the result
pub async fn run_status(settings: &Settings, json: bool) -> Result<()> {
    let source: Arc<dyn RateLimitSource> = Arc::new(HttpFetcher::new(&settings.endpoint));
    let view = fetch_view(source, settings.display.mode).await;

    if json {
        let out = serde_json::to_string_pretty(&view).context("Failed to serialize status")?;
        println!("{}", out);
    } else {
        println!("{}", render_text(&view));
    }

    match view {
        StatusView::Failed { detail, .. } => anyhow::bail!(detail),
        _ => Ok(()),
    }
}

/// Fetch once and build the view the TUI would show right after
pub async fn fetch_view(source: Arc<dyn RateLimitSource>, mode: CountdownMode) -> StatusView {
    let result = fetch_once(source).await;
    view_for(result, mode, Utc::now())
}

fn view_for(
    result: Result<RateSnapshot, FetchError>,
    mode: CountdownMode,
    now: DateTime<Utc>,
) -> StatusView {
    let mut engine = EngineState::new(std::time::Duration::ZERO);
    let seq = engine.issue_seq();
    engine.apply(FetchOutcome { seq, result }, now);
    engine.view(now, mode)
}

/// Plain-text rendering of a view
pub fn render_text(view: &StatusView) -> String {
    match view {
        StatusView::Loading => "Loading rate limits…".to_string(),
        StatusView::Failed { error, .. } => error.indicator().to_string(),
        StatusView::Gauge(gauge) => {
            let mut lines = vec![format!(
                "Mood Ring {} - {} ({}%)",
                gauge.mode.badge(),
                gauge.state.display_name(),
                gauge.fuel_percent
            )];
            lines.extend(gauge.lines());
            lines.join("\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodring_core::limits::FetchErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_exhausted_text() {
        let snapshot = RateSnapshot {
            remaining_tokens: 0,
            total_tokens: 10,
            window_seconds: 7200,
            low_effort_wait_seconds: 120,
            high_effort_wait_seconds: 0,
        };
        let view = view_for(Ok(snapshot), CountdownMode::Strict, Utc::now());

        assert_eq!(
            render_text(&view),
            [
                "Mood Ring [Strict] - exhausted (0%)",
                "Tokens: 0/10",
                "Resets in: 0h 2m 0s",
                "Low: 0h 2m 0s  High: 0h 0m 0s",
                "Window: 2h",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_parse_failure_text() {
        let view = view_for(
            Err(FetchError::Parse("missing field `remainingTokens`".to_string())),
            CountdownMode::Strict,
            Utc::now(),
        );
        assert!(matches!(
            view,
            StatusView::Failed {
                error: FetchErrorKind::Parse,
                ..
            }
        ));
        assert_eq!(render_text(&view), "Error parsing API");
    }

    #[tokio::test]
    async fn test_fetch_view_with_scripted_source() {
        let source = Arc::new(
            crate::demo::ScriptedSource::new(vec![RateSnapshot {
                remaining_tokens: 5,
                total_tokens: 10,
                window_seconds: 3600,
                low_effort_wait_seconds: 0,
                high_effort_wait_seconds: 0,
            }])
            .without_latency(),
        );
        let view = fetch_view(source, CountdownMode::LowEffort).await;
        let gauge = view.gauge().expect("gauge view");
        assert_eq!(gauge.fuel_percent, 64);
        assert_eq!(gauge.headline, "Next token: Ready");
    }
}
