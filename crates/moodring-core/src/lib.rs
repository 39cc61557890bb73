//! Core library for moodring.
//!
//! Polls a token-bucket rate-limit endpoint, derives a small display state
//! machine from each snapshot, and produces countdown views that are refreshed
//! locally once per second between fetches.

pub mod config;
pub mod engine;
pub mod limits;
pub mod nudge;
pub mod scheduler;
