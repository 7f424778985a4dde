// Cleaning stage: normalizes text cells, drops annotation rows and parses the
// mandatory date column. Rows without a valid timestamp are removed from every
// column in lockstep.

pub mod date_parser;

pub use date_parser::parse_day_first;

use tracing::{debug, info};

use crate::error::DashboardError;
use crate::table::{CleanTable, Column, NormalizedTable, RawTable, DATE_COLUMN};

/// Rows containing this text in any cell are descriptive preambles, not data.
pub const ANNOTATION_MARKER: &str = "Definition:";

/// Cell contents that stand for a missing value in exports.
pub const MISSING_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Normalize a single text cell.
///
/// Narrow no-break spaces, no-break spaces and tabs become plain spaces, double
/// quotes are removed, and surrounding whitespace is trimmed. An empty result or
/// one of [`MISSING_MARKERS`] is a missing value.
pub fn normalize_cell(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '"')
        .map(|c| match c {
            '\u{202f}' | '\u{a0}' | '\t' => ' ',
            other => other,
        })
        .collect();

    let trimmed = cleaned.trim();
    if trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn is_annotation(row: &[Option<String>]) -> bool {
    row.iter()
        .flatten()
        .any(|cell| cell.contains(ANNOTATION_MARKER))
}

/// Turn a [`RawTable`] into a [`CleanTable`] keyed on the parsed `Datum` column.
pub fn clean(raw: RawTable) -> Result<CleanTable, DashboardError> {
    let RawTable { headers, rows } = raw;
    let total = rows.len();

    let rows: Vec<Vec<Option<String>>> = rows
        .into_iter()
        .map(|row| row.iter().map(|cell| normalize_cell(cell)).collect::<Vec<_>>())
        .filter(|row| !is_annotation(row))
        .collect();

    let annotations = total - rows.len();
    if annotations > 0 {
        info!(
            "Dropped {} annotation row(s) containing {:?}",
            annotations, ANNOTATION_MARKER
        );
    }

    let date_idx = headers
        .iter()
        .position(|h| h == DATE_COLUMN)
        .ok_or_else(|| DashboardError::Schema(DATE_COLUMN.to_string()))?;

    let mut dates = Vec::with_capacity(rows.len());
    let mut kept = Vec::with_capacity(rows.len());
    for (idx, row) in rows.into_iter().enumerate() {
        match row[date_idx].as_deref().and_then(parse_day_first) {
            Some(ts) => {
                dates.push(ts);
                kept.push(row);
            }
            None => debug!(
                "Row {} has no parseable date ({:?}), dropping",
                idx, row[date_idx]
            ),
        }
    }

    let dropped = total - annotations - kept.len();
    if dropped > 0 {
        info!("Dropped {} row(s) without a parseable date", dropped);
    }

    if kept.is_empty() {
        return Err(DashboardError::Parse(DATE_COLUMN.to_string()));
    }

    let columns = headers
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| *idx != date_idx)
        .map(|(idx, name)| {
            let values = kept.iter().map(|row| row[idx].clone()).collect();
            Column::new(name, values)
        })
        .collect();

    Ok(NormalizedTable {
        dates: Column::new(DATE_COLUMN, dates),
        columns,
    })
}
