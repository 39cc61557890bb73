mod store;

pub use store::{AppState, SharedState, PENDING_MARQUEE};
