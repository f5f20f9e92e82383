use serde::Serialize;
use std::fmt;

use crate::progress::utility::round2;

/// Progress tier of a district, from its current completion percentage.
///
/// | Today        | Category |
/// |--------------|----------|
/// | >= 100       | Full     |
/// | [85, 100)    | High     |
/// | [50, 85)     | Mid      |
/// | < 50         | Low      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Full,
    High,
    Mid,
    Low,
}

impl Category {
    pub const ALL: [Category; 4] = [Category::Full, Category::High, Category::Mid, Category::Low];

    /// Category used for map colouring. Compares the raw value.
    ///
    /// A missing value fails every threshold and lands in `Low`.
    pub fn from_progress(progress: Option<f64>) -> Self {
        match progress {
            Some(p) if p >= 100.0 => Category::Full,
            Some(p) if p >= 85.0 => Category::High,
            Some(p) if p >= 50.0 => Category::Mid,
            _ => Category::Low,
        }
    }

    /// Bucket used for the KPI counts. The `>= 100` test is made on the value
    /// rounded to 2 decimals, so 99.996 counts as complete here while
    /// [`Category::from_progress`] still colours it `High`.
    pub fn for_count(progress: f64) -> Option<Self> {
        if progress.is_nan() {
            return None;
        }
        let bucket = if round2(progress) >= 100.0 {
            Category::Full
        } else if progress >= 85.0 {
            Category::High
        } else if progress >= 50.0 {
            Category::Mid
        } else {
            Category::Low
        };
        Some(bucket)
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Full => "100%",
            Category::High => "85-99%",
            Category::Mid => "50-84%",
            Category::Low => "<50%",
        }
    }

    /// Fill colour on the choropleth.
    pub fn color(self) -> &'static str {
        match self {
            Category::Full => "#2ca02c",
            Category::High => "#ffd700",
            Category::Mid => "#ff9800",
            Category::Low => "#d62728",
        }
    }
}

/// Progress band covered by one last-vs-today comparison chart.
///
/// Completed districts have no chart, so there is no band for them. Bounds
/// compare the raw value and the low band starts at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Band {
    Low,
    Mid,
    High,
}

impl Band {
    pub const ALL: [Band; 3] = [Band::Low, Band::Mid, Band::High];

    /// Half-open `[lo, hi)` range of today's progress.
    pub fn bounds(self) -> (f64, f64) {
        match self {
            Band::Low => (0.0, 50.0),
            Band::Mid => (50.0, 85.0),
            Band::High => (85.0, 100.0),
        }
    }

    pub fn contains(self, progress: f64) -> bool {
        let (lo, hi) = self.bounds();
        progress >= lo && progress < hi
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_boundaries() {
        assert_eq!(Category::from_progress(Some(150.0)), Category::Full);
        assert_eq!(Category::from_progress(Some(100.0)), Category::Full);
        assert_eq!(Category::from_progress(Some(99.99)), Category::High);
        assert_eq!(Category::from_progress(Some(85.0)), Category::High);
        assert_eq!(Category::from_progress(Some(84.99)), Category::Mid);
        assert_eq!(Category::from_progress(Some(50.0)), Category::Mid);
        assert_eq!(Category::from_progress(Some(49.99)), Category::Low);
        assert_eq!(Category::from_progress(Some(0.0)), Category::Low);
        assert_eq!(Category::from_progress(Some(-3.0)), Category::Low);
    }

    #[test]
    fn test_missing_progress_colours_low() {
        assert_eq!(Category::from_progress(None), Category::Low);
    }

    #[test]
    fn test_count_bucket_rounds_only_the_full_test() {
        assert_eq!(Category::for_count(99.996), Some(Category::Full));
        assert_eq!(Category::from_progress(Some(99.996)), Category::High);

        assert_eq!(Category::for_count(99.994), Some(Category::High));
        assert_eq!(Category::for_count(85.0), Some(Category::High));
        assert_eq!(Category::for_count(84.999), Some(Category::Mid));
        assert_eq!(Category::for_count(50.0), Some(Category::Mid));
        assert_eq!(Category::for_count(49.999), Some(Category::Low));
    }

    #[test]
    fn test_count_bucket_skips_nan() {
        assert_eq!(Category::for_count(f64::NAN), None);
    }

    #[test]
    fn test_band_bounds_are_half_open() {
        assert!(Band::Low.contains(0.0));
        assert!(!Band::Low.contains(-0.5));
        assert!(!Band::Low.contains(50.0));
        assert!(Band::Mid.contains(50.0));
        assert!(Band::High.contains(85.0));
        assert!(Band::High.contains(99.996));
        assert!(!Band::High.contains(100.0));
    }

    #[test]
    fn test_labels_and_serde_names() {
        assert_eq!(Category::Mid.to_string(), "50-84%");
        assert_eq!(serde_json::to_string(&Category::Full).unwrap(), "\"FULL\"");
    }
}
