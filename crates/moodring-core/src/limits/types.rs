//! Rate-limit data types and the endpoint's wire format.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One parsed rate-limit response.
///
/// Every successful fetch produces a fresh snapshot that replaces the previous
/// one entirely; snapshots are never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RateSnapshot {
    /// Tokens still available in the current window
    pub remaining_tokens: u64,
    /// Bucket capacity
    pub total_tokens: u64,
    /// Length of the rolling window
    pub window_seconds: u64,
    /// Seconds until a low-effort request is allowed again (0 = unknown/none)
    pub low_effort_wait_seconds: u64,
    /// Seconds until a high-effort request is allowed again (0 = unknown/none)
    pub high_effort_wait_seconds: u64,
}

impl RateSnapshot {
    /// Window length in hours, as shown in the `Window:` line
    pub fn window_hours(&self) -> f64 {
        self.window_seconds as f64 / 3600.0
    }
}

/// Failure of a single fetch attempt
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport failure or non-success HTTP status
    #[error("network error: {0}")]
    Network(String),

    /// Body was not the expected JSON shape
    #[error("parse error: {0}")]
    Parse(String),
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Network(_) => FetchErrorKind::Network,
            FetchError::Parse(_) => FetchErrorKind::Parse,
        }
    }
}

/// Error category without the detail message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    Network,
    Parse,
}

impl FetchErrorKind {
    /// Text that replaces the gauge while the error is current
    pub fn indicator(&self) -> &'static str {
        match self {
            FetchErrorKind::Network => "Network Error",
            FetchErrorKind::Parse => "Error parsing API",
        }
    }
}

/// Request body sent to the endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitRequest {
    pub request_kind: String,
    pub model_name: String,
}

/// Response body as returned by the endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RateLimitResponse {
    pub remaining_tokens: u64,
    pub total_tokens: u64,
    #[serde(default)]
    pub window_size_seconds: Option<u64>,
    #[serde(default)]
    pub low_effort_rate_limits: Option<EffortLimits>,
    #[serde(default)]
    pub high_effort_rate_limits: Option<EffortLimits>,
}

/// Per-effort-level block of the response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EffortLimits {
    #[serde(default)]
    pub wait_time_seconds: Option<u64>,
}

impl EffortLimits {
    pub(crate) fn wait(limits: Option<&EffortLimits>) -> u64 {
        limits.and_then(|l| l.wait_time_seconds).unwrap_or(0)
    }
}
