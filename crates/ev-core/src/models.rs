use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Integer parsing ───────────────────────────────────────────────────────────

/// Parse the leading base-10 integer of `value`.
///
/// Leading whitespace and a single `+`/`-` sign are accepted; parsing stops at
/// the first non-digit, so `"250 mi"` yields `250` and `"12.7"` yields `12`.
/// Returns `None` when no digit follows the optional sign. Values beyond the
/// `i64` range saturate.
///
/// # Examples
///
/// ```
/// use ev_core::models::parse_leading_int;
///
/// assert_eq!(parse_leading_int("  42"), Some(42));
/// assert_eq!(parse_leading_int("-7km"), Some(-7));
/// assert_eq!(parse_leading_int("abc"), None);
/// assert_eq!(parse_leading_int(""), None);
/// ```
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut seen_digit = false;
    let mut acc: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        let d = i64::from(b - b'0');
        acc = acc.saturating_mul(10).saturating_add(d);
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { -acc } else { acc })
}

// ── RawRecord ─────────────────────────────────────────────────────────────────

/// One CSV row, reduced to the columns the dashboard reads.
///
/// Every field holds the cell text exactly as parsed; a column missing from
/// the header or from a short row reads as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub vehicle_type: String,
    pub model_year: String,
    pub electric_range: String,
    pub make: String,
    pub model: String,
}

/// The structural filter applied at load time.
///
/// A row is kept iff its vehicle type is non-empty, its model year is
/// non-empty, and its electric range parses as an integer (see
/// [`parse_leading_int`]). Rows failing it are dropped without being reported
/// as errors.
pub fn is_valid_record(raw: &RawRecord) -> bool {
    !raw.vehicle_type.is_empty()
        && !raw.model_year.is_empty()
        && parse_leading_int(&raw.electric_range).is_some()
}

// ── VehicleRecord ─────────────────────────────────────────────────────────────

/// A row that passed [`is_valid_record`], with its range already parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub vehicle_type: String,
    /// Model year as written; it is only guaranteed non-empty.
    pub model_year: String,
    /// Electric range in miles.
    pub electric_range: i64,
    /// Text of the range cell, kept for display.
    pub electric_range_text: String,
    pub make: String,
    pub model: String,
}

impl VehicleRecord {
    /// Convert a raw row, returning `None` exactly when the row is invalid.
    pub fn from_raw(raw: RawRecord) -> Option<Self> {
        if !is_valid_record(&raw) {
            return None;
        }
        let electric_range = parse_leading_int(&raw.electric_range)?;
        Some(Self {
            vehicle_type: raw.vehicle_type,
            model_year: raw.model_year,
            electric_range,
            electric_range_text: raw.electric_range,
            make: raw.make,
            model: raw.model,
        })
    }

    /// Model year parsed with [`parse_leading_int`], `None` when unparsable.
    pub fn parsed_year(&self) -> Option<i64> {
        parse_leading_int(&self.model_year)
    }
}

// ── Load statistics / Dataset ─────────────────────────────────────────────────

/// Counters collected while parsing a CSV source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadStats {
    /// Data rows encountered (header excluded).
    pub rows_read: usize,
    /// Rows that passed the validity predicate.
    pub rows_kept: usize,
    /// Rows dropped as invalid or unreadable.
    pub rows_dropped: usize,
    /// Parser chunks consumed.
    pub chunks: usize,
    /// Wall-clock seconds from fetch start to parse completion.
    pub load_time_seconds: f64,
    /// When parsing completed.
    pub loaded_at: DateTime<Utc>,
}

impl LoadStats {
    /// Fraction of read rows that were dropped, `0.0` for an empty source.
    pub fn drop_rate(&self) -> f64 {
        if self.rows_read == 0 {
            return 0.0;
        }
        self.rows_dropped as f64 / self.rows_read as f64
    }
}

/// The working dataset: every valid record in source order.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<VehicleRecord>,
    pub stats: LoadStats,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ── InsightSummary ────────────────────────────────────────────────────────────

/// Occurrence count of one manufacturer within the sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeCount {
    pub make: String,
    pub count: u64,
}

/// Aggregate statistics computed once over the sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightSummary {
    /// Sampled records with a positive range.
    pub total_evs: u64,
    /// Rounded mean range over those records; `0` when there are none.
    pub avg_range: u64,
    /// Most frequent makes, count descending, first-seen order on ties.
    pub top_makes: Vec<MakeCount>,
    /// Model year to count. Unordered; see [`InsightSummary::sorted_years`].
    pub years: HashMap<i64, u64>,
    /// Number of records the statistics were computed from.
    pub sample_size: usize,
}

impl InsightSummary {
    /// Histogram entries ordered by ascending year.
    pub fn sorted_years(&self) -> Vec<(i64, u64)> {
        let mut years: Vec<(i64, u64)> = self.years.iter().map(|(y, c)| (*y, *c)).collect();
        years.sort_unstable_by_key(|(y, _)| *y);
        years
    }

    /// The most frequent make, if any record was sampled.
    pub fn top_make(&self) -> Option<&str> {
        self.top_makes.first().map(|m| m.make.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(vehicle_type: &str, year: &str, range: &str) -> RawRecord {
        RawRecord {
            vehicle_type: vehicle_type.to_string(),
            model_year: year.to_string(),
            electric_range: range.to_string(),
            make: "TESLA".to_string(),
            model: "MODEL 3".to_string(),
        }
    }

    // ── parse_leading_int ─────────────────────────────────────────────────────

    #[test]
    fn test_parse_leading_int_plain() {
        assert_eq!(parse_leading_int("250"), Some(250));
        assert_eq!(parse_leading_int("0"), Some(0));
    }

    #[test]
    fn test_parse_leading_int_trailing_garbage() {
        assert_eq!(parse_leading_int("250 miles"), Some(250));
        assert_eq!(parse_leading_int("12.7"), Some(12));
        assert_eq!(parse_leading_int("2015abc"), Some(2015));
    }

    #[test]
    fn test_parse_leading_int_sign_and_whitespace() {
        assert_eq!(parse_leading_int("  -15"), Some(-15));
        assert_eq!(parse_leading_int("+8"), Some(8));
        assert_eq!(parse_leading_int("\t33"), Some(33));
    }

    #[test]
    fn test_parse_leading_int_rejects_non_numeric() {
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int(" + 5"), None);
        assert_eq!(parse_leading_int(".5"), None);
    }

    #[test]
    fn test_parse_leading_int_saturates() {
        assert_eq!(parse_leading_int("99999999999999999999999"), Some(i64::MAX));
    }

    // ── is_valid_record ───────────────────────────────────────────────────────

    #[test]
    fn test_valid_record_accepted() {
        assert!(is_valid_record(&raw("Battery Electric Vehicle (BEV)", "2020", "291")));
    }

    #[test]
    fn test_zero_range_is_still_valid() {
        assert!(is_valid_record(&raw("Battery Electric Vehicle (BEV)", "2023", "0")));
    }

    #[test]
    fn test_missing_vehicle_type_rejected() {
        assert!(!is_valid_record(&raw("", "2020", "291")));
    }

    #[test]
    fn test_missing_model_year_rejected() {
        assert!(!is_valid_record(&raw("Plug-in Hybrid Electric Vehicle (PHEV)", "", "25")));
    }

    #[test]
    fn test_non_numeric_range_rejected() {
        assert!(!is_valid_record(&raw("Battery Electric Vehicle (BEV)", "2020", "n/a")));
        assert!(!is_valid_record(&raw("Battery Electric Vehicle (BEV)", "2020", "")));
    }

    #[test]
    fn test_unparsable_year_is_still_valid() {
        // The predicate only requires a non-empty year.
        assert!(is_valid_record(&raw("Battery Electric Vehicle (BEV)", "abc", "100")));
    }

    // ── VehicleRecord ─────────────────────────────────────────────────────────

    #[test]
    fn test_from_raw_parses_range() {
        let rec = VehicleRecord::from_raw(raw("BEV", "2019", "220 mi")).expect("valid");
        assert_eq!(rec.electric_range, 220);
        assert_eq!(rec.electric_range_text, "220 mi");
        assert_eq!(rec.make, "TESLA");
        assert_eq!(rec.parsed_year(), Some(2019));
    }

    #[test]
    fn test_from_raw_rejects_invalid() {
        assert!(VehicleRecord::from_raw(raw("BEV", "", "220")).is_none());
    }

    // ── LoadStats ─────────────────────────────────────────────────────────────

    #[test]
    fn test_drop_rate() {
        let stats = LoadStats {
            rows_read: 4,
            rows_kept: 3,
            rows_dropped: 1,
            chunks: 1,
            load_time_seconds: 0.0,
            loaded_at: Utc::now(),
        };
        assert!((stats.drop_rate() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_drop_rate_empty_source() {
        let stats = LoadStats {
            rows_read: 0,
            rows_kept: 0,
            rows_dropped: 0,
            chunks: 0,
            load_time_seconds: 0.0,
            loaded_at: Utc::now(),
        };
        assert_eq!(stats.drop_rate(), 0.0);
    }

    // ── InsightSummary ────────────────────────────────────────────────────────

    #[test]
    fn test_sorted_years_ascending() {
        let mut summary = InsightSummary::default();
        summary.years.insert(2020, 4);
        summary.years.insert(2013, 1);
        summary.years.insert(2031, 2);
        assert_eq!(summary.sorted_years(), vec![(2013, 1), (2020, 4), (2031, 2)]);
    }

    #[test]
    fn test_top_make_none_when_empty() {
        assert!(InsightSummary::default().top_make().is_none());
    }

    #[test]
    fn test_summary_serializes_years_as_object() {
        let mut summary = InsightSummary::default();
        summary.years.insert(2015, 2);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["years"]["2015"], 2);
        assert_eq!(json["avg_range"], 0);
    }
}
