use std::collections::HashSet;

use crate::progress::category::{Band, Category};
use crate::progress::types::{ComparisonGroup, ComparisonRow, ProgressRecord, ProgressSummary};
use crate::progress::utility::{pct, round2};

impl ProgressSummary {
    /// Aggregates the KPI figures over a normalized record set.
    ///
    /// Records with a missing `progress_today` are left out of all four
    /// bucket counts. Missing GP counts add nothing to the total.
    #[tracing::instrument(skip(records), fields(records = records.len()))]
    pub fn from_records(records: &[ProgressRecord], total_planning_units: f64) -> Self {
        let mut s = ProgressSummary {
            total_planning_units,
            ..Default::default()
        };

        let distinct: HashSet<&str> = records.iter().map(|r| r.district.as_str()).collect();
        s.total_districts = distinct.len();

        for r in records {
            s.total_gp_plan_started += r.gp_plan_started.unwrap_or(0.0);

            let Some(today) = r.progress_today else {
                continue;
            };
            match Category::for_count(today) {
                Some(Category::Full) => {
                    s.completed_count += 1;
                    s.fully_completed_districts.push(r.district.clone());
                }
                Some(Category::High) => s.high_count += 1,
                Some(Category::Mid) => s.mid_count += 1,
                Some(Category::Low) => s.low_count += 1,
                None => {}
            }
        }

        s.fully_completed_districts.sort();
        s.total_progress_percent = pct(s.total_gp_plan_started, total_planning_units);
        s
    }

    pub fn count_for(&self, category: Category) -> usize {
        match category {
            Category::Full => self.completed_count,
            Category::High => self.high_count,
            Category::Mid => self.mid_count,
            Category::Low => self.low_count,
        }
    }
}

/// Builds the last-vs-today comparison groups, lowest band first.
pub fn comparison_groups(records: &[ProgressRecord]) -> Vec<ComparisonGroup> {
    Band::ALL
        .into_iter()
        .map(|band| {
            let rows = records
                .iter()
                .filter_map(|r| {
                    let today = r.progress_today?;
                    band.contains(today).then(|| ComparisonRow {
                        district: r.district.clone(),
                        progress_last: r.progress_last,
                        progress_today: today,
                    })
                })
                .collect();
            ComparisonGroup { band, rows }
        })
        .collect()
}

/// Whether a record made the achievement list (rounded `>= 100` test).
pub fn is_fully_completed(record: &ProgressRecord) -> bool {
    record
        .progress_today
        .is_some_and(|today| round2(today) >= 100.0)
}
