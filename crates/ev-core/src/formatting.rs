/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use ev_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1_234), "1,234");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Format a range in miles, e.g. `"200 miles"`.
pub fn format_miles(miles: u64) -> String {
    format!("{} miles", format_count(miles))
}

/// `part / whole` as a percentage string with `decimals` places.
///
/// Returns `"0%"`-style output when `whole` is zero rather than dividing by it.
///
/// ```
/// use ev_core::formatting::format_percentage;
///
/// assert_eq!(format_percentage(1, 4, 1), "25.0%");
/// assert_eq!(format_percentage(3, 0, 0), "0%");
/// ```
pub fn format_percentage(part: usize, whole: usize, decimals: usize) -> String {
    let pct = if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    };
    format!("{:.prec$}%", pct, prec = decimals)
}

/// Format a duration in seconds: milliseconds below one second, otherwise
/// seconds with two decimals.
pub fn format_elapsed(seconds: f64) -> String {
    if seconds < 1.0 {
        format!("{}ms", (seconds * 1000.0).round() as u64)
    } else {
        format!("{:.2}s", seconds)
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of a digit string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = s.len() % 3;
    for (i, c) in s.chars().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
