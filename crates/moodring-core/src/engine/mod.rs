//! Status engine: derive a display state from each snapshot and recompute
//! countdowns locally between fetches.

pub mod countdown;
pub mod derive;
pub mod state;

pub use countdown::{
    format_hms, fuel_band, fuel_percent, remaining_secs, render_gauge, FuelBand, GaugeView,
    StatusView,
};
pub use derive::{classify, derive, DisplayState, ResetClock};
pub use state::{ApplyResult, EngineState, FetchOutcome, SharedEngine};
