//! moodring - terminal rate-limit gauge with local countdowns.

pub mod config;
pub mod demo;
pub mod state;
pub mod status;
pub mod ui;
