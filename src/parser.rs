//! CSV parser for the sheet export.

use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use std::collections::HashSet;
use tracing::debug;

use crate::progress::types::{REQUIRED_COLUMNS, RawRow};

/// Parses CSV bytes (header row first) into [`RawRow`]s.
///
/// Header names are trimmed. Rows shorter than the header leave the
/// trailing columns absent.
///
/// # Errors
///
/// Fails if the bytes are empty, not UTF-8, two headers share a trimmed
/// name, a row carries more fields than the header, or any required column
/// is missing.
pub fn parse_table(bytes: &[u8]) -> Result<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(bytes);

    let headers: Vec<String> = rdr
        .headers()
        .context("failed to read CSV header")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        bail!("source is empty or has no header row");
    }

    let mut seen: HashSet<&str> = HashSet::new();
    if let Some(dup) = headers
        .iter()
        .filter(|h| !h.is_empty())
        .find(|h| !seen.insert(h.as_str()))
    {
        bail!("source has duplicate column '{}'", dup);
    }

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == col))
        .collect();
    if !missing.is_empty() {
        bail!("source is missing required columns: {}", missing.join(", "));
    }

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("failed to read CSV row {}", i + 1))?;
        if record.len() > headers.len() {
            bail!(
                "CSV row {} has {} fields, header has {}",
                i + 1,
                record.len(),
                headers.len()
            );
        }
        rows.push(RawRow::new(headers.iter().zip(record.iter())));
    }

    debug!(columns = headers.len(), rows = rows.len(), "CSV parsed");
    Ok(rows)
}
