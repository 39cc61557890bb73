use std::fs::{self, File};
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use moodring::config::{Config, Settings};
use moodring::ui::App;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Config::parse_args();

    // Load settings
    let mut settings = Settings::load(cli.config.as_ref())?;
    settings.merge_cli(&cli);
    settings.validate();

    if let Some(json) = cli.status_json() {
        setup_logging(cli.debug, false);
        return moodring::status::run_status(&settings, json).await;
    }

    // The TUI owns the terminal, so logs go to a file
    setup_logging(cli.debug, true);

    if cli.is_demo_mode() {
        return moodring::demo::run_demo(settings).await;
    }

    let mut app = App::new(settings);
    app.run().await
}

fn setup_logging(debug: bool, interactive: bool) {
    let filter = if debug {
        EnvFilter::new("moodring=debug,moodring_core=debug")
    } else {
        EnvFilter::new("moodring=info,moodring_core=info")
    };

    let registry = tracing_subscriber::registry().with(filter);

    if !interactive {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
        return;
    }

    match open_log_file() {
        Some(file) => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init(),
        None => registry.init(),
    }
}

/// `~/.cache/moodring/moodring.log`, if it can be created
fn open_log_file() -> Option<File> {
    let dir = dirs::cache_dir()?.join("moodring");
    fs::create_dir_all(&dir).ok()?;
    File::options()
        .create(true)
        .append(true)
        .open(dir.join("moodring.log"))
        .ok()
}
