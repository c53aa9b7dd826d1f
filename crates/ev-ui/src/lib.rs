//! Terminal UI layer for the EV dashboard.
//!
//! Provides themes, the header and metric-box components, the top-makes and
//! by-year charts, the paginated vehicle table, and the main application
//! event loop built on top of [`ratatui`].

pub mod app;
pub mod charts;
pub mod components;
pub mod table_view;
pub mod themes;

pub use ev_core as core;
