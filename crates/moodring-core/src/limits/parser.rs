//! Parse the rate-limit endpoint's JSON body into a `RateSnapshot`.

use super::types::{EffortLimits, FetchError, RateLimitResponse, RateSnapshot};

/// Parse a response body.
///
/// Expected shape:
/// ```text
/// {
///   "remainingTokens": 5,
///   "totalTokens": 10,
///   "windowSizeSeconds": 7200,
///   "lowEffortRateLimits":  { "waitTimeSeconds": 0 },
///   "highEffortRateLimits": { "waitTimeSeconds": 0 }
/// }
/// ```
///
/// `remainingTokens` and `totalTokens` are required. Missing effort blocks,
/// wait times, or window size read as 0 (unknown).
pub fn parse_rate_limits(body: &str) -> Result<RateSnapshot, FetchError> {
    let response: RateLimitResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;

    if response.remaining_tokens > response.total_tokens {
        return Err(FetchError::Parse(format!(
            "remainingTokens ({}) exceeds totalTokens ({})",
            response.remaining_tokens, response.total_tokens
        )));
    }

    Ok(RateSnapshot {
        remaining_tokens: response.remaining_tokens,
        total_tokens: response.total_tokens,
        window_seconds: response.window_size_seconds.unwrap_or(0),
        low_effort_wait_seconds: EffortLimits::wait(response.low_effort_rate_limits.as_ref()),
        high_effort_wait_seconds: EffortLimits::wait(response.high_effort_rate_limits.as_ref()),
    })
}
