//! Explicit dashboard state and its reducer.
//!
//! The dashboard moves from [`LoadPhase::Loading`] to exactly one of
//! [`LoadPhase::Loaded`] or [`LoadPhase::LoadFailed`]. Every change goes through
//! [`reduce`], which consumes the previous state and returns the next one.

use std::sync::Arc;

use ev_core::config::PAGE_SIZE;
use ev_core::models::{Dataset, InsightSummary, VehicleRecord};
use ev_core::pagination::Pager;

// ── Public types ──────────────────────────────────────────────────────────────

/// The two structures published by a successful load.
#[derive(Debug)]
pub struct LoadedDashboard {
    /// Human-readable source the data came from.
    pub source: String,
    pub dataset: Dataset,
    pub summary: InsightSummary,
}

/// Where the one-shot load currently stands.
#[derive(Debug, Clone)]
pub enum LoadPhase {
    Loading,
    Loaded(Arc<LoadedDashboard>),
    /// Display text of the load error.
    LoadFailed(String),
}

/// Everything the UI needs to draw a frame.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub phase: LoadPhase,
    pub pager: Pager,
}

/// State transitions understood by [`reduce`].
#[derive(Debug, Clone)]
pub enum DashboardAction {
    LoadCompleted(Arc<LoadedDashboard>),
    LoadFailed(String),
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    /// Zero-based page index; clamped to the available pages.
    JumpToPage(usize),
}

impl DashboardState {
    /// Initial state: loading, with an empty pager of `page_size` rows.
    pub fn new(page_size: usize) -> Self {
        Self {
            phase: LoadPhase::Loading,
            pager: Pager::new(0, page_size),
        }
    }

    /// The loaded data, if the load has succeeded.
    pub fn loaded(&self) -> Option<&LoadedDashboard> {
        match &self.phase {
            LoadPhase::Loaded(data) => Some(data),
            _ => None,
        }
    }

    /// Rows of the selected page; empty until the dataset is loaded.
    pub fn current_rows(&self) -> &[VehicleRecord] {
        match self.loaded() {
            Some(data) => self.pager.slice(&data.dataset.records),
            None => &[],
        }
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

// ── Reducer ───────────────────────────────────────────────────────────────────

/// Compute the state following `action`.
///
/// A load outcome is accepted only while loading; the dashboard never
/// reloads. Page actions outside the loaded phase leave the state untouched.
pub fn reduce(state: DashboardState, action: DashboardAction) -> DashboardState {
    let DashboardState { phase, pager } = state;
    match (phase, action) {
        (LoadPhase::Loading, DashboardAction::LoadCompleted(data)) => DashboardState {
            pager: Pager::new(data.dataset.len(), pager.page_size()),
            phase: LoadPhase::Loaded(data),
        },
        (LoadPhase::Loading, DashboardAction::LoadFailed(message)) => DashboardState {
            phase: LoadPhase::LoadFailed(message),
            pager,
        },
        (LoadPhase::Loaded(data), action) => {
            let pager = match action {
                DashboardAction::NextPage => pager.next(),
                DashboardAction::PreviousPage => pager.previous(),
                DashboardAction::FirstPage => pager.first(),
                DashboardAction::LastPage => pager.last(),
                DashboardAction::JumpToPage(index) => pager.jump_to(index),
                DashboardAction::LoadCompleted(_) | DashboardAction::LoadFailed(_) => {
                    tracing::debug!("ignoring load outcome after the dashboard loaded");
                    pager
                }
            };
            DashboardState {
                phase: LoadPhase::Loaded(data),
                pager,
            }
        }
        (phase, _) => DashboardState { phase, pager },
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
