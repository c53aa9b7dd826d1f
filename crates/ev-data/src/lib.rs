//! Data layer for the EV dashboard.
//!
//! Responsible for fetching and parsing the vehicle population CSV, filtering
//! it to valid records, computing the one-shot insight summary over the
//! leading sample, and running the combined load-and-summarise pipeline.

pub mod aggregator;
pub mod pipeline;
pub mod reader;

pub use ev_core as core;
