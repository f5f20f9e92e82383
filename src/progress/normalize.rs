use tracing::debug;

use crate::progress::category::Category;
use crate::progress::types::{
    DISTRICT_COLUMN, GP_PLAN_COLUMN, Normalized, PROGRESS_LAST_COLUMN, PROGRESS_TODAY_COLUMN,
    ProgressRecord, RawRow, SEQUENCE_COLUMN, STATE_TOTAL_MARKER,
};
use crate::progress::utility::{canonical_district, parse_number};

/// Why a raw row did not become a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    Marker,
    Blank,
}

/// Turns raw feed rows into [`ProgressRecord`]s, keeping input order.
///
/// Never fails: a cell that does not parse is recorded as missing and the
/// row is kept.
#[tracing::instrument(skip(rows), fields(rows = rows.len()))]
pub fn normalize(rows: &[RawRow]) -> Normalized {
    let mut out = Normalized::default();

    for row in rows {
        match to_record(row) {
            Ok(record) => out.records.push(record),
            Err(Skip::Marker) => out.skipped_marker_rows += 1,
            Err(Skip::Blank) => out.skipped_blank_rows += 1,
        }
    }

    debug!(
        rows = rows.len(),
        records = out.records.len(),
        skipped_marker_rows = out.skipped_marker_rows,
        skipped_blank_rows = out.skipped_blank_rows,
        "Rows normalized"
    );
    out
}

/// True for the rolled-up "State Total" row, whatever its case or padding.
pub fn is_aggregate_marker(sequence_label: &str) -> bool {
    sequence_label.trim().eq_ignore_ascii_case(STATE_TOTAL_MARKER)
}

fn to_record(row: &RawRow) -> Result<ProgressRecord, Skip> {
    if row.get(SEQUENCE_COLUMN).is_some_and(is_aggregate_marker) {
        return Err(Skip::Marker);
    }

    let district = canonical_district(row.get(DISTRICT_COLUMN).unwrap_or_default());
    if district.is_empty() {
        return Err(Skip::Blank);
    }

    let progress_today = parse_number(row.get(PROGRESS_TODAY_COLUMN));

    Ok(ProgressRecord {
        district,
        progress_today,
        progress_last: parse_number(row.get(PROGRESS_LAST_COLUMN)),
        gp_plan_started: parse_number(row.get(GP_PLAN_COLUMN)),
        category: Category::from_progress(progress_today),
    })
}
