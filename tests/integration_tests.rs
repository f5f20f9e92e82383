use district_progress::config::ReportConfig;
use district_progress::geo::BoundarySet;
use district_progress::output::{MAP_FILE, RECORDS_FILE, SUMMARY_FILE, write_outputs};
use district_progress::parser::parse_table;
use district_progress::progress::{Band, Category, normalize};
use district_progress::report::build_report;
use std::time::Duration;

const REPORT: &[u8] = include_bytes!("fixtures/progress_report.csv");
const BOUNDARIES: &[u8] = include_bytes!("fixtures/assam_districts.geojson");

#[test]
fn test_full_pipeline() {
    let rows = parse_table(REPORT).expect("Failed to parse report");
    let report = build_report(&rows, &ReportConfig::default());

    let names: Vec<&str> = report.records.iter().map(|r| r.district.as_str()).collect();
    assert_eq!(
        names,
        vec!["KAMRUP", "DIBRUGARH", "CACHAR", "BARPETA", "HOJAI", "MAJULI"]
    );

    let s = &report.summary;
    assert_eq!(s.total_districts, 6);
    assert_eq!(s.completed_count, 2);
    assert_eq!(s.high_count, 1);
    assert_eq!(s.mid_count, 1);
    assert_eq!(s.low_count, 1);
    assert_eq!(s.fully_completed_districts, vec!["BARPETA", "DIBRUGARH"]);
    assert_eq!(s.total_gp_plan_started, 159.0);
    assert!((s.total_progress_percent - 159.0 / 2654.0 * 100.0).abs() < 1e-9);

    // Rounded for the count, raw for the colour.
    let barpeta = &report.records[3];
    assert_eq!(barpeta.category, Category::High);

    let hojai = &report.records[4];
    assert_eq!(hojai.progress_today, None);
}

#[test]
fn test_comparison_groups_from_fixture() {
    let rows = parse_table(REPORT).unwrap();
    let report = build_report(&rows, &ReportConfig::default());

    let groups: Vec<(Band, Vec<&str>)> = report
        .comparisons
        .iter()
        .map(|g| {
            (
                g.band,
                g.rows.iter().map(|r| r.district.as_str()).collect(),
            )
        })
        .collect();

    assert_eq!(
        groups,
        vec![
            (Band::Low, vec!["MAJULI"]),
            (Band::Mid, vec!["KAMRUP"]),
            (Band::High, vec!["CACHAR", "BARPETA"]),
        ]
    );
}

#[test]
fn test_map_join_drops_unmatched_districts() {
    let rows = parse_table(REPORT).unwrap();
    let records = normalize(&rows).records;
    let boundaries = BoundarySet::from_json(BOUNDARIES).unwrap();

    let map = boundaries.choropleth(&records);
    let features = map["features"].as_array().unwrap();

    assert_eq!(features.len(), 5);
    assert_eq!(boundaries.unmatched_districts(&records), vec!["HOJAI"]);

    let barpeta = features
        .iter()
        .find(|f| f["properties"]["District"] == "BARPETA")
        .unwrap();
    assert_eq!(barpeta["properties"]["Category"], "85-99%");
    assert_eq!(barpeta["properties"]["fill"], "#ffd700");
}

#[test]
fn test_outputs_written_to_directory() {
    let dir = std::env::temp_dir().join("district_progress_integration_outputs");
    let _ = std::fs::remove_dir_all(&dir);

    let rows = parse_table(REPORT).unwrap();
    let report = build_report(&rows, &ReportConfig::default());
    let map = BoundarySet::from_json(BOUNDARIES)
        .unwrap()
        .choropleth(&report.records);

    write_outputs(&dir, &report, Some(&map)).unwrap();

    let records_csv = std::fs::read_to_string(dir.join(RECORDS_FILE)).unwrap();
    assert_eq!(records_csv.lines().count(), 7);
    assert!(records_csv.contains("HOJAI,,12.0,4.0,LOW"));
    assert!(dir.join(SUMMARY_FILE).exists());
    assert!(dir.join(MAP_FILE).exists());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_load_fixture_from_path() {
    let bytes = district_progress::fetch::load_source(
        "tests/fixtures/progress_report.csv",
        Duration::from_secs(5),
    )
    .await
    .unwrap();

    assert_eq!(bytes, REPORT);
}
