//! CLI entry point for the district progress dashboard.
//!
//! `report` runs the whole pipeline and writes the dashboard outputs;
//! `districts` lists the normalized districts and whether each one joins
//! the boundary map.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use district_progress::config::{
    DEFAULT_OUTPUT_DIR, DEFAULT_PLANNING_UNITS, DEFAULT_SOURCE_URL, DEFAULT_TIMEOUT_SECS,
    ReportConfig,
};
use district_progress::{
    fetch::load_source,
    geo::BoundarySet,
    output::{render_dashboard, write_outputs},
    parser::parse_table,
    progress::{RawRow, normalize, summary::is_fully_completed},
    report::build_report,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tabled::{Table, Tabled, settings::Style};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "district_progress")]
#[command(about = "Builds the district progress dashboard from the sheet export", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// URL or local path of the CSV report
    #[arg(short, long, env = "DASHBOARD_SOURCE", default_value = DEFAULT_SOURCE_URL)]
    source: String,

    /// GeoJSON file with district boundaries
    #[arg(short, long, env = "DASHBOARD_BOUNDARIES")]
    boundaries: Option<PathBuf>,

    /// Give up on the fetch after this many seconds
    #[arg(long, env = "DASHBOARD_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the report, write records/summary/map files and print the dashboard
    Report {
        #[command(flatten)]
        source: SourceArgs,

        /// Directory to write records.csv, summary.json and map.geojson to
        #[arg(short, long, env = "DASHBOARD_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,

        /// Total planning units in the state (denominator of total progress)
        #[arg(long, env = "DASHBOARD_PLANNING_UNITS", default_value_t = DEFAULT_PLANNING_UNITS)]
        planning_units: f64,
    },
    /// List normalized districts with their category and map join status
    Districts {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Tabled)]
struct DistrictLine {
    #[tabled(rename = "District")]
    district: String,
    #[tabled(rename = "Today (%)")]
    today: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Achieved")]
    achieved: String,
    #[tabled(rename = "On map")]
    on_map: String,
}

impl SourceArgs {
    fn into_config(self) -> ReportConfig {
        ReportConfig {
            source: self.source,
            boundaries: self.boundaries,
            timeout: Duration::from_secs(self.timeout_secs),
            ..Default::default()
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_tracing()?;

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Report {
            source,
            output_dir,
            planning_units,
        } => {
            let config = ReportConfig {
                output_dir,
                total_planning_units: planning_units,
                ..source.into_config()
            };
            run_report(&config).await
        }
        Commands::Districts { source } => list_districts(&source.into_config()).await,
    };

    if let Err(e) = &result {
        error!("Run aborted: {e:#}");
    }
    result
}

/// Logging setup: colored stderr + JSON rolling log file.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/district_progress.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("district_progress.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    Ok(file_guard)
}

/// Fetches and parses the feed. Any failure here ends the run.
async fn load_rows(config: &ReportConfig) -> Result<Vec<RawRow>> {
    config.validate()?;
    let bytes = load_source(&config.source, config.timeout).await?;
    let rows = parse_table(&bytes)?;
    info!(rows = rows.len(), "Source loaded");
    Ok(rows)
}

fn load_boundaries(config: &ReportConfig) -> Result<Option<BoundarySet>> {
    config.boundaries.as_deref().map(BoundarySet::load).transpose()
}

#[tracing::instrument(skip(config), fields(source = %config.source))]
async fn run_report(config: &ReportConfig) -> Result<()> {
    let rows = load_rows(config).await?;
    let report = build_report(&rows, config);

    let map = match load_boundaries(config)? {
        Some(boundaries) => {
            for district in boundaries.unmatched_districts(&report.records) {
                warn!(district, "District has no boundary polygon, left off the map");
            }
            Some(boundaries.choropleth(&report.records))
        }
        None => {
            info!("No boundaries given, skipping map output");
            None
        }
    };

    write_outputs(&config.output_dir, &report, map.as_ref())?;
    println!("{}", render_dashboard(&report));
    Ok(())
}

#[tracing::instrument(skip(config), fields(source = %config.source))]
async fn list_districts(config: &ReportConfig) -> Result<()> {
    let rows = load_rows(config).await?;
    let normalized = normalize(&rows);
    let boundaries = load_boundaries(config)?;

    let lines: Vec<DistrictLine> = normalized
        .records
        .iter()
        .map(|r| DistrictLine {
            district: r.district.clone(),
            today: r
                .progress_today
                .map_or_else(|| "-".to_string(), |t| format!("{t:.2}")),
            category: r.category.to_string(),
            achieved: if is_fully_completed(r) { "yes" } else { "" }.to_string(),
            on_map: match &boundaries {
                Some(b) if b.contains(&r.district) => "yes",
                Some(_) => "no",
                None => "-",
            }
            .to_string(),
        })
        .collect();

    info!(
        districts = lines.len(),
        skipped_marker_rows = normalized.skipped_marker_rows,
        skipped_blank_rows = normalized.skipped_blank_rows,
        "Districts listed"
    );
    println!("{}", Table::new(lines).with(Style::markdown()));
    Ok(())
}
