//! Runtime layer for the EV dashboard.
//!
//! Holds the explicit dashboard state and its reducer, and runs the one-shot
//! asynchronous load whose outcome is delivered to the UI over a channel.

pub mod orchestrator;
pub mod store;

pub use ev_core as core;
pub use ev_data as data;
