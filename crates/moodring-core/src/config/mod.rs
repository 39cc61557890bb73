//! Configuration sections shared by the core engine and the binary.
//!
//! The binary composes these into its TOML `Settings`; every field has a
//! serde default so partial config files are accepted.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Rate-limit endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointSettings {
    /// URL that receives the POST
    #[serde(default = "default_url")]
    pub url: String,

    /// `requestKind` field of the request body
    #[serde(default = "default_request_kind")]
    pub request_kind: String,

    /// `modelName` field of the request body
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Extra request headers (e.g. a session cookie)
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Overall request timeout; the transport default applies when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_url() -> String {
    "https://grok.com/rest/rate-limits".to_string()
}

fn default_request_kind() -> String {
    "DEFAULT".to_string()
}

fn default_model_name() -> String {
    "grok-3".to_string()
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            url: default_url(),
            request_kind: default_request_kind(),
            model_name: default_model_name(),
            headers: BTreeMap::new(),
            timeout_secs: None,
        }
    }
}

/// Scheduler timing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSettings {
    /// Local countdown tick in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Unconditional resync interval in seconds
    #[serde(default = "default_resync_interval")]
    pub resync_interval_secs: u64,

    /// Delay between a user submission and the follow-up fetch
    #[serde(default = "default_activity_delay")]
    pub activity_delay_ms: u64,

    /// Minimum spacing between zero-reached fetches
    #[serde(default = "default_zero_poll_cooldown")]
    pub zero_poll_cooldown_secs: u64,
}

fn default_tick_ms() -> u64 {
    1000
}

fn default_resync_interval() -> u64 {
    30 * 60
}

fn default_activity_delay() -> u64 {
    2000
}

fn default_zero_poll_cooldown() -> u64 {
    10
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            resync_interval_secs: default_resync_interval(),
            activity_delay_ms: default_activity_delay(),
            zero_poll_cooldown_secs: default_zero_poll_cooldown(),
        }
    }
}

impl ScheduleSettings {
    /// Clamp intervals so timers never run with a zero period
    pub fn validate(&mut self) {
        const MIN_TICK_MS: u64 = 10;
        const MIN_RESYNC_SECS: u64 = 1;

        if self.tick_ms < MIN_TICK_MS {
            self.tick_ms = MIN_TICK_MS;
        }
        if self.resync_interval_secs < MIN_RESYNC_SECS {
            self.resync_interval_secs = MIN_RESYNC_SECS;
        }
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn resync_interval(&self) -> Duration {
        Duration::from_secs(self.resync_interval_secs)
    }

    pub fn activity_delay(&self) -> Duration {
        Duration::from_millis(self.activity_delay_ms)
    }

    pub fn zero_poll_cooldown(&self) -> Duration {
        Duration::from_secs(self.zero_poll_cooldown_secs)
    }
}

/// Which reset clock drives the exhausted-state headline
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum CountdownMode {
    /// Wait for the later of the two effort levels
    #[default]
    Strict,
    /// Count down the low-effort clock only
    LowEffort,
}

impl CountdownMode {
    /// Badge shown next to the title
    pub fn badge(&self) -> &'static str {
        match self {
            CountdownMode::Strict => "[Strict]",
            CountdownMode::LowEffort => "[Low-Effort]",
        }
    }
}

/// Nudge hook settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NudgeSettings {
    /// Run the hook at all
    #[serde(default = "default_nudge_enabled")]
    pub enabled: bool,

    /// Shell command to run; the hook only logs when unset
    #[serde(default)]
    pub command: Option<String>,
}

fn default_nudge_enabled() -> bool {
    true
}

impl Default for NudgeSettings {
    fn default() -> Self {
        Self {
            enabled: default_nudge_enabled(),
            command: None,
        }
    }
}
