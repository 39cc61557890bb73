//! Hook fired when tokens are available again.
//!
//! The monitored chat UI can sit in a stale "rate limited" state after tokens
//! come back; the hook gives it a poke. By default it only logs.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::NudgeSettings;

pub trait Nudger: Send + Sync {
    fn nudge(&self);

    /// Short name for logs
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Logs the nudge and does nothing else
pub struct LogNudger;

impl Nudger for LogNudger {
    fn nudge(&self) {
        info!("Tokens available with no low-effort wait; nudge requested");
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Disabled hook
pub struct NoopNudger;

impl Nudger for NoopNudger {
    fn nudge(&self) {}

    fn name(&self) -> &'static str {
        "off"
    }
}

/// Runs a shell command, fire-and-forget
pub struct CommandNudger {
    command: String,
}

impl CommandNudger {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Nudger for CommandNudger {
    fn name(&self) -> &'static str {
        "command"
    }

    fn nudge(&self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("Nudge skipped: no async runtime");
            return;
        };

        let command = self.command.clone();
        handle.spawn(async move {
            debug!("Nudge: running {:?}", command);
            match tokio::process::Command::new("sh")
                .arg("-c")
                .arg(&command)
                .status()
                .await
            {
                Ok(status) if status.success() => {}
                Ok(status) => warn!("Nudge command exited with {}", status),
                Err(e) => warn!("Nudge command failed to start: {}", e),
            }
        });
    }
}

/// Build the hook described by the settings
pub fn from_settings(settings: &NudgeSettings) -> Arc<dyn Nudger> {
    match (&settings.enabled, &settings.command) {
        (false, _) => Arc::new(NoopNudger),
        (true, Some(command)) if !command.trim().is_empty() => {
            Arc::new(CommandNudger::new(command.clone()))
        }
        (true, _) => Arc::new(LogNudger),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_command_nudger_runs_command() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("nudged");

        let nudger = CommandNudger::new(format!("touch '{}'", marker.display()));
        nudger.nudge();

        for _ in 0..50 {
            if marker.exists() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(marker.exists());
    }

    #[test]
    fn test_command_nudger_without_runtime_is_noop() {
        CommandNudger::new("true").nudge();
    }

    #[test]
    fn test_from_settings_selects_nudger() {
        assert_eq!(from_settings(&NudgeSettings::default()).name(), "log");
        assert_eq!(
            from_settings(&NudgeSettings {
                enabled: false,
                command: Some("true".to_string()),
            })
            .name(),
            "off"
        );
        assert_eq!(
            from_settings(&NudgeSettings {
                enabled: true,
                command: Some("   ".to_string()),
            })
            .name(),
            "log"
        );
        assert_eq!(
            from_settings(&NudgeSettings {
                enabled: true,
                command: Some("notify-send hi".to_string()),
            })
            .name(),
            "command"
        );
    }

    #[tokio::test]
    async fn test_from_settings_command_runs() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("nudged");

        let nudger = from_settings(&NudgeSettings {
            enabled: true,
            command: Some(format!("touch '{}'", marker.display())),
        });
        nudger.nudge();

        for _ in 0..50 {
            if marker.exists() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(marker.exists());
    }
}
