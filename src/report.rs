//! Assembles everything the presentation side needs from one snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::ReportConfig;
use crate::progress::{
    ComparisonGroup, ProgressRecord, ProgressSummary, RawRow, comparison_groups, normalize,
};

/// A complete dashboard snapshot. Rebuilt from scratch on every run.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub summary: ProgressSummary,
    pub comparisons: Vec<ComparisonGroup>,
    #[serde(skip)]
    pub records: Vec<ProgressRecord>,
}

/// Runs the normalize → summarize stages over parsed feed rows.
#[tracing::instrument(skip(rows, config), fields(rows = rows.len()))]
pub fn build_report(rows: &[RawRow], config: &ReportConfig) -> DashboardReport {
    let normalized = normalize(rows);
    let summary = ProgressSummary::from_records(&normalized.records, config.total_planning_units);
    let comparisons = comparison_groups(&normalized.records);

    info!(
        districts = summary.total_districts,
        completed = summary.completed_count,
        high = summary.high_count,
        mid = summary.mid_count,
        low = summary.low_count,
        total_progress_percent = summary.total_progress_percent,
        "Report built"
    );

    DashboardReport {
        generated_at: Utc::now(),
        source: config.source.clone(),
        summary,
        comparisons,
        records: normalized.records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::Band;
    use crate::progress::types::{
        DISTRICT_COLUMN, GP_PLAN_COLUMN, PROGRESS_LAST_COLUMN, PROGRESS_TODAY_COLUMN,
        SEQUENCE_COLUMN,
    };
    use std::sync::{Arc, Mutex};
    use tracing::span::{Attributes, Id};
    use tracing::{Subscriber, subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::registry::LookupSpan;
    use tracing_subscriber::{Layer, registry};

    /// Records the name of every span opened while installed.
    #[derive(Clone, Default)]
    struct SpanNames(Arc<Mutex<Vec<&'static str>>>);

    impl<S> Layer<S> for SpanNames
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
            self.0.lock().unwrap().push(attrs.metadata().name());
        }
    }

    #[test]
    fn test_build_report_missing_today_kept_but_uncounted() {
        let rows = vec![
            RawRow::new([
                (SEQUENCE_COLUMN, "1"),
                (DISTRICT_COLUMN, "Sonitpur"),
                (PROGRESS_LAST_COLUMN, "30"),
                (PROGRESS_TODAY_COLUMN, ""),
                (GP_PLAN_COLUMN, "7"),
            ]),
            RawRow::new([
                (SEQUENCE_COLUMN, "2"),
                (DISTRICT_COLUMN, "Udalguri"),
                (PROGRESS_LAST_COLUMN, "70"),
                (PROGRESS_TODAY_COLUMN, "88"),
                (GP_PLAN_COLUMN, ""),
            ]),
        ];

        let report = build_report(&rows, &ReportConfig::default());

        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].district, "SONITPUR");
        assert_eq!(report.records[0].progress_today, None);
        assert_eq!(report.summary.high_count, 1);
        assert_eq!(
            report.summary.completed_count
                + report.summary.high_count
                + report.summary.mid_count
                + report.summary.low_count,
            1
        );
        assert_eq!(report.summary.total_gp_plan_started, 7.0);
        assert_eq!(report.comparisons[2].band, Band::High);
        assert_eq!(report.comparisons[2].rows[0].district, "UDALGURI");
        assert!(report.comparisons[0].rows.is_empty());
    }

    #[test]
    fn test_pipeline_stages_open_spans() {
        let rows = vec![RawRow::new([
            (SEQUENCE_COLUMN, "1"),
            (DISTRICT_COLUMN, "Kamrup"),
            (PROGRESS_LAST_COLUMN, "40"),
            (PROGRESS_TODAY_COLUMN, "52"),
            (GP_PLAN_COLUMN, "10"),
        ])];
        let spans = SpanNames::default();

        subscriber::with_default(registry().with(spans.clone()), || {
            build_report(&rows, &ReportConfig::default());
        });

        let names = spans.0.lock().unwrap();
        assert_eq!(*names, vec!["build_report", "normalize", "from_records"]);
    }
}
