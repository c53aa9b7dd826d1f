//! Core domain layer for the EV insights dashboard.
//!
//! Holds the vehicle record models and validity predicate, the named
//! configuration constants, the error type shared by the loader and pipeline,
//! pagination helpers, number formatting, and CLI settings.

pub mod config;
pub mod error;
pub mod formatting;
pub mod models;
pub mod pagination;
pub mod settings;
