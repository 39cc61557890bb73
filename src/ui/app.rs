use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use moodring_core::limits::{HttpFetcher, RateLimitSource};
use moodring_core::nudge;
use moodring_core::scheduler::{Scheduler, SchedulerHandle, StatusViewReceiver};

use crate::config::Settings;
use crate::state::{AppState, SharedState};

use super::components::{HelpPopup, MoodRing, StatusBar};
use super::Layout;

/// Main application
pub struct App {
    state: SharedState,
    settings: Settings,
    source: Arc<dyn RateLimitSource>,
    layout: Layout,
}

impl App {
    /// Create a new application polling the configured endpoint
    pub fn new(settings: Settings) -> Self {
        let source = Arc::new(HttpFetcher::new(&settings.endpoint));
        Self::with_source(settings, source)
    }

    /// Create an application reading from an arbitrary source
    pub fn with_source(settings: Settings, source: Arc<dyn RateLimitSource>) -> Self {
        Self {
            state: AppState::shared(),
            settings,
            source,
            layout: Layout::new(),
        }
    }

    /// Run the application
    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        crossterm::terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Start scheduler
        let scheduler = Scheduler::new(
            Arc::clone(&self.source),
            nudge::from_settings(&self.settings.nudge),
            self.settings.schedule.clone(),
            self.settings.display.mode,
        );
        let handle = scheduler.start();
        let mut views = handle.subscribe();
        info!(
            "Gauge started (mode: {:?}, resync: {}s)",
            self.settings.display.mode, self.settings.schedule.resync_interval_secs
        );

        // Main loop
        let result = self.main_loop(&mut terminal, &handle, &mut views).await;

        handle.stop();

        // Restore terminal
        crossterm::terminal::disable_raw_mode()?;
        crossterm::execute!(
            terminal.backend_mut(),
            crossterm::terminal::LeaveAlternateScreen
        )?;
        terminal.show_cursor()?;

        result
    }

    async fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        handle: &SchedulerHandle,
        views: &mut StatusViewReceiver,
    ) -> Result<()> {
        loop {
            // Check if we should quit
            {
                let state = self.state.read();
                if !state.running {
                    break;
                }
            }

            // Draw UI
            terminal.draw(|frame| {
                let state = self.state.read();
                let gauge_height = MoodRing::height(&state.view, &self.settings.ui);
                let areas = self.layout.calculate(frame.area(), gauge_height);

                MoodRing::render(
                    frame,
                    areas.gauge,
                    &state.view,
                    state.marquee_offset,
                    &self.settings.ui,
                );
                StatusBar::render(frame, areas.status_bar, &state);

                if state.show_help {
                    let popup_area = self.layout.popup_area(frame.area(), 60, 70);
                    HelpPopup::render(frame, popup_area);
                }
            })?;

            // Tick marquee animation
            {
                let mut state = self.state.write();
                state.tick_marquee();
            }

            // Handle events with timeout
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers, handle);
                    }
                }
            }

            // Pick up the latest view from the scheduler
            if views.has_changed().unwrap_or(false) {
                let view = views.borrow_and_update().clone();
                self.state.write().update_view(view);
            }

            tokio::task::yield_now().await;
        }

        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers, handle: &SchedulerHandle) {
        let mut state = self.state.write();

        // Any key closes the help popup
        if state.show_help {
            state.show_help = false;
            return;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                state.quit();
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                state.quit();
            }

            // A message was sent in the monitored UI
            KeyCode::Enter => {
                state.record_activity();
                drop(state);
                handle.notify_activity();
            }

            KeyCode::Char('?') => {
                state.toggle_help();
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_creation() {
        let settings = Settings::default();
        let _app = App::new(settings);
    }
}
