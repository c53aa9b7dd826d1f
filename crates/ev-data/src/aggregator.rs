//! One-shot insight aggregation over the sampled dataset.
//!
//! Every statistic is computed from the same deterministic prefix of the
//! working dataset (see [`InsightAggregator::sample`]), never from the full
//! record set.

use std::collections::HashMap;

use ev_core::config::InsightConfig;
use ev_core::models::{InsightSummary, MakeCount, VehicleRecord};

// ── RangeStatistics ───────────────────────────────────────────────────────────

/// Count and rounded mean of positive ranges within the sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeStatistics {
    pub total_evs: u64,
    pub avg_range: u64,
}

// ── InsightAggregator ─────────────────────────────────────────────────────────

/// Stateless helper computing the [`InsightSummary`].
pub struct InsightAggregator;

impl InsightAggregator {
    /// The first `sample_size` records, or all of them when fewer exist.
    pub fn sample(records: &[VehicleRecord], sample_size: usize) -> &[VehicleRecord] {
        &records[..sample_size.min(records.len())]
    }

    /// Count the records with a positive range and round their mean half-up.
    ///
    /// The average is `0` when no record has a positive range.
    pub fn range_statistics(sample: &[VehicleRecord]) -> RangeStatistics {
        let (count, sum) = sample
            .iter()
            .map(|r| r.electric_range)
            .filter(|range| *range > 0)
            .fold((0u64, 0u128), |(count, sum), range| {
                (count + 1, sum + range as u128)
            });

        if count == 0 {
            return RangeStatistics::default();
        }

        // round(sum / count) for positive operands, in integer arithmetic.
        let count_wide = u128::from(count);
        let avg = (2 * sum + count_wide) / (2 * count_wide);

        RangeStatistics {
            total_evs: count,
            avg_range: u64::try_from(avg).unwrap_or(u64::MAX),
        }
    }

    /// Rank makes by occurrence count, keeping at most `limit`.
    ///
    /// Grouping is by exact, case-sensitive make text. Makes with equal counts
    /// keep the order in which they first appear in the sample.
    pub fn top_makes(sample: &[VehicleRecord], limit: usize) -> Vec<MakeCount> {
        let mut order: Vec<MakeCount> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for record in sample {
            match positions.get(record.make.as_str()) {
                Some(&idx) => order[idx].count += 1,
                None => {
                    positions.insert(record.make.as_str(), order.len());
                    order.push(MakeCount {
                        make: record.make.clone(),
                        count: 1,
                    });
                }
            }
        }

        // Stable sort keeps first-seen order among equal counts.
        order.sort_by(|a, b| b.count.cmp(&a.count));
        order.truncate(limit);
        order
    }

    /// Count records per parsed model year, skipping unparsable years and
    /// years before `min_year`. There is no upper bound.
    pub fn year_histogram(sample: &[VehicleRecord], min_year: i64) -> HashMap<i64, u64> {
        let mut years: HashMap<i64, u64> = HashMap::new();
        for year in sample.iter().filter_map(VehicleRecord::parsed_year) {
            if year >= min_year {
                *years.entry(year).or_insert(0) += 1;
            }
        }
        years
    }

    /// Compute the full [`InsightSummary`] from `records`.
    pub fn summarize(records: &[VehicleRecord], config: &InsightConfig) -> InsightSummary {
        let sample = Self::sample(records, config.sample_size);
        let ranges = Self::range_statistics(sample);

        InsightSummary {
            total_evs: ranges.total_evs,
            avg_range: ranges.avg_range,
            top_makes: Self::top_makes(sample, config.top_makes),
            years: Self::year_histogram(sample, config.min_year),
            sample_size: sample.len(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
