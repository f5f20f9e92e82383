/// Canonical join key for a district: trimmed and upper-cased.
pub fn canonical_district(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Parses a numeric cell. Empty, non-numeric and NaN cells are missing.
pub fn parse_number(cell: Option<&str>) -> Option<f64> {
    let s = cell?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Rounds to 2 decimals, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// `part / total * 100`, or 0.0 when `total` is not positive.
pub fn pct(part: f64, total: f64) -> f64 {
    if total <= 0.0 { 0.0 } else { part / total * 100.0 }
}
