//! Data types shared by the normalization pipeline.

use serde::Serialize;
use std::collections::HashMap;

use crate::progress::category::{Band, Category};

/// Sequence-label column; holds the aggregate marker on the total row.
pub const SEQUENCE_COLUMN: &str = "Sl. No.";
pub const DISTRICT_COLUMN: &str = "District";
pub const PROGRESS_LAST_COLUMN: &str = "Percentage of progress as on last status";
pub const PROGRESS_TODAY_COLUMN: &str = "Percentage of progress as on today status";
pub const GP_PLAN_COLUMN: &str = "GP Plan started";

/// Columns the feed must carry for a run to proceed.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    SEQUENCE_COLUMN,
    DISTRICT_COLUMN,
    PROGRESS_LAST_COLUMN,
    PROGRESS_TODAY_COLUMN,
    GP_PLAN_COLUMN,
];

/// Value of the sequence label on the rolled-up state row.
pub const STATE_TOTAL_MARKER: &str = "State Total";

/// One row as received from the feed, keyed by trimmed column name.
///
/// Cells are kept as raw text; numeric coercion happens in the normalizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    /// Builds a row from `(column, value)` pairs, trimming every column name.
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().trim().to_string(), v.into()))
            .collect();
        Self { fields }
    }

    /// Raw cell for `column`, looked up by its trimmed name.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column.trim()).map(String::as_str)
    }
}

/// A cleaned district row, one per retained input row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressRecord {
    pub district: String,
    pub progress_today: Option<f64>,
    pub progress_last: Option<f64>,
    pub gp_plan_started: Option<f64>,
    pub category: Category,
}

/// Output of the normalizer: retained records plus what was dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub records: Vec<ProgressRecord>,
    pub skipped_marker_rows: usize,
    pub skipped_blank_rows: usize,
}

/// Headline figures shown on the KPI tiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub total_districts: usize,
    pub completed_count: usize,
    pub high_count: usize,
    pub mid_count: usize,
    pub low_count: usize,
    pub fully_completed_districts: Vec<String>,
    pub total_gp_plan_started: f64,
    pub total_planning_units: f64,
    pub total_progress_percent: f64,
}

/// One bar pair in a last-vs-today comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub district: String,
    pub progress_last: Option<f64>,
    pub progress_today: f64,
}

/// Districts whose current progress falls in one chart's band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonGroup {
    pub band: Band,
    pub rows: Vec<ComparisonRow>,
}
