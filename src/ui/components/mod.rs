mod help_popup;
mod mood_ring;
mod status_bar;

pub use help_popup::HelpPopup;
pub use mood_ring::{band_color, MoodRing};
pub use status_bar::StatusBar;
