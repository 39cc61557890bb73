use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use moodring_core::config::{CountdownMode, EndpointSettings, NudgeSettings, ScheduleSettings};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Mood Ring - live rate-limit gauge")]
pub struct Config {
    /// Enable debug mode
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Rate-limit endpoint URL
    #[arg(short, long, global = true)]
    pub endpoint: Option<String>,

    /// Model name sent in the request body
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Which reset clock drives the exhausted countdown
    #[arg(long, value_enum, global = true)]
    pub mode: Option<CountdownMode>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch once, print the current status and exit
    Status {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run the gauge against scripted data (no network)
    Demo,
}

impl Config {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Check if running in demo mode
    pub fn is_demo_mode(&self) -> bool {
        matches!(self.command, Some(Command::Demo))
    }

    /// `Some(json)` when running the one-shot status command
    pub fn status_json(&self) -> Option<bool> {
        match self.command {
            Some(Command::Status { json }) => Some(json),
            _ => None,
        }
    }
}

/// Application settings (from config file)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Endpoint and request body
    #[serde(default)]
    pub endpoint: EndpointSettings,

    /// Fetch and tick timing
    #[serde(default)]
    pub schedule: ScheduleSettings,

    /// Countdown display settings
    #[serde(default)]
    pub display: DisplaySettings,

    /// Nudge hook
    #[serde(default)]
    pub nudge: NudgeSettings,

    /// UI settings
    #[serde(default)]
    pub ui: UiSettings,
}

/// Countdown display settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Strict (max of both clocks) or low-effort countdown
    #[serde(default)]
    pub mode: CountdownMode,
}

/// UI-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    /// Enable color output
    #[serde(default = "default_color")]
    pub color: bool,

    /// Show the per-effort-level countdown lines
    #[serde(default = "default_show_effort_lines")]
    pub show_effort_lines: bool,
}

fn default_color() -> bool {
    true
}

fn default_show_effort_lines() -> bool {
    true
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            color: default_color(),
            show_effort_lines: default_show_effort_lines(),
        }
    }
}

impl Settings {
    /// Load settings from config file or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        // Try custom path first
        if let Some(p) = path {
            if p.exists() {
                return Self::read(p);
            }
            anyhow::bail!("Config file not found: {:?}", p);
        }

        // Try default config locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("moodring/config.toml")),
            dirs::home_dir().map(|p| p.join(".config/moodring/config.toml")),
            dirs::home_dir().map(|p| p.join(".moodring.toml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                return Self::read(path);
            }
        }

        // Return defaults if no config file found
        Ok(Self::default())
    }

    fn read(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Merge CLI config into settings (CLI takes precedence)
    pub fn merge_cli(&mut self, cli: &Config) {
        if let Some(endpoint) = &cli.endpoint {
            self.endpoint.url = endpoint.clone();
        }
        if let Some(model) = &cli.model {
            self.endpoint.model_name = model.clone();
        }
        if let Some(mode) = cli.mode {
            self.display.mode = mode;
        }
    }

    /// Validate and normalize settings values
    pub fn validate(&mut self) {
        self.schedule.validate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.endpoint.url, "https://grok.com/rest/rate-limits");
        assert_eq!(settings.endpoint.model_name, "grok-3");
        assert_eq!(settings.schedule.resync_interval_secs, 1800);
        assert_eq!(settings.display.mode, CountdownMode::Strict);
        assert!(settings.nudge.enabled);
        assert!(settings.ui.color);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            [endpoint]
            model_name = "grok-4"

            [schedule]
            activity_delay_ms = 1500

            [display]
            mode = "low-effort"

            [nudge]
            command = "notify-send 'tokens back'"

            [ui]
            show_effort_lines = false
        "#;

        let settings: Settings = toml::from_str(toml).expect("Should parse TOML");
        assert_eq!(settings.endpoint.model_name, "grok-4");
        assert_eq!(settings.endpoint.request_kind, "DEFAULT");
        assert_eq!(settings.schedule.activity_delay_ms, 1500);
        assert_eq!(settings.schedule.tick_ms, 1000);
        assert_eq!(settings.display.mode, CountdownMode::LowEffort);
        assert_eq!(
            settings.nudge.command.as_deref(),
            Some("notify-send 'tokens back'")
        );
        assert!(!settings.ui.show_effort_lines);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[schedule]\ntick_ms = 500\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.schedule.tick_ms, 500);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(Settings::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[schedule\n").unwrap();
        let err = Settings::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_merge_cli_overrides() {
        let cli = Config::parse_from([
            "moodring",
            "--endpoint",
            "http://localhost:8080/limits",
            "--model",
            "grok-4",
            "--mode",
            "low-effort",
            "status",
            "--json",
        ]);

        let mut settings = Settings::default();
        settings.merge_cli(&cli);
        assert_eq!(settings.endpoint.url, "http://localhost:8080/limits");
        assert_eq!(settings.endpoint.model_name, "grok-4");
        assert_eq!(settings.display.mode, CountdownMode::LowEffort);
        assert_eq!(cli.status_json(), Some(true));
        assert!(!cli.is_demo_mode());
    }
}
