//! Reusable dashboard widgets.

pub mod header;
pub mod metrics;
