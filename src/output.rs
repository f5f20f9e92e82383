//! Output formatting and persistence for the dashboard.
//!
//! Writes the record table as CSV, the summary as JSON, the map layer as
//! GeoJSON, and renders a markdown dashboard for the console.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tabled::{Table, Tabled, settings::Style};
use tracing::{debug, info};

use crate::progress::{Band, Category, ComparisonGroup, ProgressRecord};
use crate::report::DashboardReport;

pub const RECORDS_FILE: &str = "records.csv";
pub const SUMMARY_FILE: &str = "summary.json";
pub const MAP_FILE: &str = "map.geojson";

#[derive(Tabled)]
struct KpiTile {
    #[tabled(rename = "KPI")]
    title: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct ComparisonLine {
    #[tabled(rename = "District")]
    district: String,
    #[tabled(rename = "Last Status (%)")]
    last: String,
    #[tabled(rename = "Today (%)")]
    today: String,
}

/// Writes the normalized records as CSV, replacing any previous file.
///
/// Missing values are written as empty cells.
pub fn write_records(path: &Path, records: &[ProgressRecord]) -> Result<()> {
    debug!(path = %path.display(), records = records.len(), "Writing records CSV");

    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to create '{}'", path.display()))?;

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    fs::write(path, s).with_context(|| format!("failed to write '{}'", path.display()))?;
    Ok(())
}

/// Writes every output file of a run into `dir`, creating it if needed.
pub fn write_outputs(dir: &Path, report: &DashboardReport, map: Option<&Value>) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;

    write_records(&dir.join(RECORDS_FILE), &report.records)?;
    write_json(&dir.join(SUMMARY_FILE), report)?;
    if let Some(map) = map {
        write_json(&dir.join(MAP_FILE), map)?;
    }

    info!(dir = %dir.display(), map = map.is_some(), "Outputs written");
    Ok(())
}

fn fmt_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

fn kpi_title(category: Category) -> &'static str {
    match category {
        Category::Full => "District achieved 100%",
        Category::High => "District Between 85% – 99%",
        Category::Mid => "District Between 50% – 84%",
        Category::Low => "District < 50%",
    }
}

fn comparison_heading(band: Band) -> &'static str {
    match band {
        Band::Low => "Districts (0% – 49%) : Last Status vs Today",
        Band::Mid => "Districts (50% – 84%) : Last Status vs Today",
        Band::High => "Districts (85% – 99%) : Last Status vs Today",
    }
}

fn empty_comparison_message(band: Band) -> &'static str {
    match band {
        Band::Low => "No districts currently between 0% and 49%.",
        Band::Mid => "No districts currently between 50% and 85%.",
        Band::High => "No districts currently between 85% and 99%.",
    }
}

fn render_comparison(group: &ComparisonGroup) -> String {
    let mut out = format!("## {}\n\n", comparison_heading(group.band));
    if group.rows.is_empty() {
        out.push_str(&format!("{}\n\n", empty_comparison_message(group.band)));
        return out;
    }

    let lines: Vec<ComparisonLine> = group
        .rows
        .iter()
        .map(|r| ComparisonLine {
            district: r.district.clone(),
            last: fmt_pct(r.progress_last),
            today: fmt_pct(Some(r.progress_today)),
        })
        .collect();
    out.push_str(&format!("{}\n\n", Table::new(lines).with(Style::markdown())));
    out
}

/// Renders the dashboard as markdown: KPI tiles, comparison tables and the
/// achievement list.
pub fn render_dashboard(report: &DashboardReport) -> String {
    let summary = &report.summary;
    let mut out = String::from("# District Progress Dashboard\n\n");

    out.push_str(&format!(
        "Source: {}  \nGenerated: {}\n\n",
        report.source,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    let mut tiles = vec![KpiTile {
        title: "Total Progress Percentage".to_string(),
        value: format!("{:.2}", summary.total_progress_percent),
    }];
    tiles.extend(Category::ALL.into_iter().map(|c| KpiTile {
        title: kpi_title(c).to_string(),
        value: summary.count_for(c).to_string(),
    }));
    out.push_str(&format!("{}\n\n", Table::new(tiles).with(Style::markdown())));

    for group in &report.comparisons {
        out.push_str(&render_comparison(group));
    }

    out.push_str("## ACHIEVEMENT\n\n");
    if summary.fully_completed_districts.is_empty() {
        out.push_str("No districts have achieved full completion yet.\n");
    } else {
        out.push_str(&format!(
            "### Fully Completed Districts ({})\n\n{}\n",
            summary.fully_completed_districts.len(),
            summary.fully_completed_districts.join(" | ")
        ));
    }

    out
}
