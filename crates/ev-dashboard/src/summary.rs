//! Plain-text and JSON reports for the `summary` view.

use ev_core::formatting::{format_count, format_elapsed, format_miles, format_percentage};
use ev_core::models::{Dataset, InsightSummary};
use serde_json::json;

/// Human-readable report of the load and the insight summary.
pub fn render_text(source: &str, dataset: &Dataset, summary: &InsightSummary) -> String {
    let stats = &dataset.stats;
    let mut out = String::new();

    out.push_str("EV ANALYTICS DASHBOARD\n");
    out.push_str(&"=".repeat(60));
    out.push('\n');
    out.push_str(&format!("Source:          {}\n", source));
    out.push_str(&format!(
        "Rows:            {} read, {} kept, {} dropped ({})\n",
        format_count(stats.rows_read as u64),
        format_count(stats.rows_kept as u64),
        format_count(stats.rows_dropped as u64),
        format_percentage(stats.rows_dropped, stats.rows_read, 1)
    ));
    out.push_str(&format!(
        "Load time:       {}\n\n",
        format_elapsed(stats.load_time_seconds)
    ));

    out.push_str(&format!(
        "Total EVs:       {} (Full Data)\n",
        format_count(dataset.len() as u64)
    ));
    out.push_str(&format!(
        "Average Range:   {} (Sampled, {} of {} rows with range)\n",
        format_miles(summary.avg_range),
        format_count(summary.total_evs),
        format_count(summary.sample_size as u64)
    ));
    out.push_str(&format!(
        "Top Company:     {}\n",
        summary.top_make().unwrap_or("N/A")
    ));

    out.push_str("\nTop Companies\n");
    for (rank, make) in summary.top_makes.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {:<20} {:>8}\n",
            rank + 1,
            make.make,
            format_count(make.count)
        ));
    }

    out.push_str("\nEVs by Year\n");
    for (year, count) in summary.sorted_years() {
        out.push_str(&format!("  {:<6} {:>8}\n", year, format_count(count)));
    }

    out
}

/// Machine-readable report; years are emitted in ascending order.
pub fn render_json(source: &str, dataset: &Dataset, summary: &InsightSummary) -> serde_json::Value {
    let years: Vec<serde_json::Value> = summary
        .sorted_years()
        .into_iter()
        .map(|(year, count)| json!({ "year": year, "count": count }))
        .collect();

    json!({
        "source": source,
        "stats": dataset.stats,
        "summary": {
            "total_dataset_evs": dataset.len(),
            "sample_size": summary.sample_size,
            "total_evs": summary.total_evs,
            "avg_range": summary.avg_range,
            "top_makes": summary.top_makes,
            "years": years,
        },
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
