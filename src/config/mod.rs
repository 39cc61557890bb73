mod settings;

pub use settings::{Command, Config, DisplaySettings, Settings, UiSettings};
