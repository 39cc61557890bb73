use parking_lot::RwLock;
use std::sync::Arc;

use moodring_core::engine::StatusView;

/// Shared state type alias
pub type SharedState = Arc<RwLock<AppState>>;

/// Text scrolled through the gauge while the wait time is unknown
pub const PENDING_MARQUEE: &str = "Calculating wait time…";

/// Frame period of the pending marquee
const MARQUEE_STEP_MS: u128 = 150;

/// Application state
#[derive(Debug)]
pub struct AppState {
    /// Latest view published by the scheduler
    pub view: StatusView,
    /// Whether help popup is shown
    pub show_help: bool,
    /// Whether the app is running
    pub running: bool,
    /// Activity notifications sent this session
    pub activity_count: u32,
    /// Marquee scroll offset (in chars)
    pub marquee_offset: usize,
    /// Last marquee update time
    last_marquee_update: std::time::Instant,
}

impl AppState {
    /// Create a new application state
    pub fn new() -> Self {
        Self {
            view: StatusView::Loading,
            show_help: false,
            running: true,
            activity_count: 0,
            marquee_offset: 0,
            last_marquee_update: std::time::Instant::now(),
        }
    }

    /// Create a shared state
    pub fn shared() -> SharedState {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Replace the displayed view
    pub fn update_view(&mut self, view: StatusView) {
        self.view = view;
    }

    /// Advance the pending marquee (time-based)
    pub fn tick_marquee(&mut self) {
        if self.last_marquee_update.elapsed().as_millis() >= MARQUEE_STEP_MS {
            self.last_marquee_update = std::time::Instant::now();
            self.marquee_offset = (self.marquee_offset + 1) % (PENDING_MARQUEE.chars().count() + 1);
        }
    }

    /// Record a submission in the monitored UI
    pub fn record_activity(&mut self) {
        self.activity_count = self.activity_count.saturating_add(1);
    }

    /// Toggle help popup
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = AppState::new();
        assert!(state.running);
        assert!(!state.show_help);
        assert_eq!(state.view, StatusView::Loading);
    }

    #[test]
    fn test_toggle_help_and_quit() {
        let mut state = AppState::new();
        state.toggle_help();
        assert!(state.show_help);
        state.toggle_help();
        assert!(!state.show_help);
        state.quit();
        assert!(!state.running);
    }

    #[test]
    fn test_marquee_wraps() {
        let mut state = AppState::new();
        let len = PENDING_MARQUEE.chars().count();
        state.marquee_offset = len;
        state.last_marquee_update = std::time::Instant::now() - std::time::Duration::from_secs(1);
        state.tick_marquee();
        assert_eq!(state.marquee_offset, 0);
    }
}
