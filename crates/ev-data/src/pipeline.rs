//! Load-and-summarise pipeline for the EV dashboard.
//!
//! Runs the loader once, then the aggregator once over the resulting sample,
//! returning both structures the presentation layer consumes. Usable without
//! any terminal or rendering environment.

use std::time::Instant;

use ev_core::config::{InsightConfig, LoaderConfig};
use ev_core::error::Result;
use ev_core::models::{Dataset, InsightSummary};
use tracing::{debug, info};

use crate::aggregator::InsightAggregator;
use crate::reader::{load_dataset, SourceLocator};

/// Fetch, parse, filter and summarise the CSV behind `locator`.
///
/// 1. Load the full valid-record dataset.
/// 2. Compute the [`InsightSummary`] over its leading sample.
///
/// Fetch and parse failures are returned; the summary is never computed from
/// a partial dataset.
pub async fn load_and_summarize(
    locator: &SourceLocator,
    loader: &LoaderConfig,
    insights: &InsightConfig,
) -> Result<(Dataset, InsightSummary)> {
    // ── Step 1: Load ──────────────────────────────────────────────────────────
    let dataset = load_dataset(locator, loader).await?;

    // ── Step 2: Aggregate ─────────────────────────────────────────────────────
    let aggregate_start = Instant::now();
    let summary = InsightAggregator::summarize(&dataset.records, insights);
    debug!(
        elapsed_ms = aggregate_start.elapsed().as_millis() as u64,
        "insights computed"
    );

    info!(
        total_evs = summary.total_evs,
        avg_range = summary.avg_range,
        sample = summary.sample_size,
        "Insight summary ready"
    );

    Ok((dataset, summary))
}
