//! Named configuration constants and the config structs built from them.

use serde::{Deserialize, Serialize};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Number of leading valid records used for every aggregate statistic.
pub const SAMPLE_SIZE: usize = 5_000;

/// Earliest model year counted in the year histogram.
pub const MIN_MODEL_YEAR: i64 = 2012;

/// Number of manufacturers kept in the top-makes ranking.
pub const TOP_MAKES_LIMIT: usize = 5;

/// Rows per table page.
pub const PAGE_SIZE: usize = 10;

/// Rows consumed per parser chunk while streaming the CSV.
pub const CHUNK_SIZE: usize = 10_000;

/// File name of the dataset looked up when no source is given.
pub const DEFAULT_SOURCE: &str = "Electric_Vehicle_Population_Data.csv";

// ── Column names ──────────────────────────────────────────────────────────────

pub const COL_VEHICLE_TYPE: &str = "Electric Vehicle Type";
pub const COL_MODEL_YEAR: &str = "Model Year";
pub const COL_ELECTRIC_RANGE: &str = "Electric Range";
pub const COL_MAKE: &str = "Make";
pub const COL_MODEL: &str = "Model";

/// Columns the validity predicate reads; a header without them is rejected.
pub const REQUIRED_COLUMNS: [&str; 3] = [COL_VEHICLE_TYPE, COL_MODEL_YEAR, COL_ELECTRIC_RANGE];

// ── InsightConfig ─────────────────────────────────────────────────────────────

/// Parameters of the insight aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Maximum number of leading records sampled.
    pub sample_size: usize,
    /// Years below this are excluded from the histogram.
    pub min_year: i64,
    /// Length cap of the top-makes ranking.
    pub top_makes: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            sample_size: SAMPLE_SIZE,
            min_year: MIN_MODEL_YEAR,
            top_makes: TOP_MAKES_LIMIT,
        }
    }
}

// ── LoaderConfig ──────────────────────────────────────────────────────────────

/// Parameters of the CSV loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Rows per parser chunk. Zero is treated as one.
    pub chunk_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_config_defaults() {
        let cfg = InsightConfig::default();
        assert_eq!(cfg.sample_size, 5_000);
        assert_eq!(cfg.min_year, 2012);
        assert_eq!(cfg.top_makes, 5);
    }

    #[test]
    fn test_loader_config_defaults() {
        assert_eq!(LoaderConfig::default().chunk_size, 10_000);
    }

    #[test]
    fn test_required_columns_cover_predicate() {
        assert!(REQUIRED_COLUMNS.contains(&"Electric Vehicle Type"));
        assert!(REQUIRED_COLUMNS.contains(&"Model Year"));
        assert!(REQUIRED_COLUMNS.contains(&"Electric Range"));
        assert!(!REQUIRED_COLUMNS.contains(&"Make"));
    }
}
