//! Demo mode: run the gauge against a scripted source instead of the network.

pub mod scenario;

use std::sync::Arc;

use anyhow::Result;

use crate::config::Settings;
use crate::ui::App;

pub use scenario::{default_script, demo_schedule, ScriptedSource};

/// Run the TUI with the default demo script
pub async fn run_demo(mut settings: Settings) -> Result<()> {
    settings.schedule = demo_schedule();
    let source = Arc::new(ScriptedSource::new(default_script()));
    let mut app = App::with_source(settings, source);
    app.run().await
}
