//! Run configuration.
//!
//! Every value has a built-in default and can be overridden from the CLI or
//! the environment (see `main.rs`).

use anyhow::{Result, bail};
use std::path::PathBuf;
use std::time::Duration;

/// Google Sheets CSV export of the district progress report.
pub const DEFAULT_SOURCE_URL: &str = "https://docs.google.com/spreadsheets/d/1JuOrZ5hj0NbTCTbo3KGF0yCHf8uaDSaGGPnALQmsF3k/export?format=csv";

/// Number of gram panchayats expected to start a plan across the state.
/// Denominator of the total progress percentage.
pub const DEFAULT_PLANNING_UNITS: f64 = 2654.0;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_OUTPUT_DIR: &str = "dashboard";

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    /// URL or local path of the CSV report.
    pub source: String,
    pub total_planning_units: f64,
    /// GeoJSON district boundaries; the map output is skipped without it.
    pub boundaries: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub timeout: Duration,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE_URL.to_string(),
            total_planning_units: DEFAULT_PLANNING_UNITS,
            boundaries: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ReportConfig {
    pub fn validate(&self) -> Result<()> {
        if self.source.trim().is_empty() {
            bail!("source must not be empty");
        }
        if !self.total_planning_units.is_finite() || self.total_planning_units <= 0.0 {
            bail!(
                "total planning units must be a positive number, got {}",
                self.total_planning_units
            );
        }
        if self.timeout.is_zero() {
            bail!("timeout must be at least one second");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ReportConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.total_planning_units, 2654.0);
        assert!(config.source.ends_with("export?format=csv"));
    }

    #[test]
    fn test_rejects_bad_denominator() {
        for units in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = ReportConfig {
                total_planning_units: units,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "accepted {units}");
        }
    }

    #[test]
    fn test_rejects_empty_source_and_zero_timeout() {
        let config = ReportConfig {
            source: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ReportConfig {
            timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
