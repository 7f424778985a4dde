use tracing::debug;

use crate::ingest::loader::LoadError;

/// Field delimiters considered by [`detect_delimiter`], in tie-break order.
pub const DELIMITER_CANDIDATES: [u8; 4] = [b';', b',', b'\t', b'|'];

/// Lines inspected from the header row onwards.
const SAMPLE_LINES: usize = 20;

/// Detect the field delimiter from the header row and the lines following it.
///
/// Lines before the header row are ignored, exports often start with a preamble
/// that has a different shape. A candidate must occur in the header; among those,
/// the one whose per-line count matches the header on the most lines wins, then
/// the one producing more fields.
pub fn detect_delimiter(text: &str, header_row: usize) -> Result<u8, LoadError> {
    let non_empty: Vec<&str> = record_lines(text).collect();
    let sample: Vec<&str> = non_empty
        .iter()
        .skip(header_row.saturating_sub(1))
        .take(SAMPLE_LINES)
        .copied()
        .collect();

    let header = sample.first().ok_or(LoadError::MissingHeaderRow {
        row: header_row,
        available: non_empty.len(),
    })?;

    let mut best: Option<(u8, (usize, usize))> = None;
    for &candidate in &DELIMITER_CANDIDATES {
        let expected = count_unquoted(header, candidate);
        if expected == 0 {
            continue;
        }

        let consistent = sample
            .iter()
            .filter(|line| count_unquoted(line, candidate) == expected)
            .count();
        let score = (consistent, expected);
        debug!(
            "Delimiter {:?}: {} of {} lines consistent, {} per line",
            candidate as char,
            consistent,
            sample.len(),
            expected
        );

        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((candidate, score));
        }
    }

    best.map(|(delimiter, _)| delimiter)
        .ok_or(LoadError::UnknownDelimiter)
}

/// Non-empty lines split on `\r\n`, `\r` or `\n`, the terminators the CSV reader accepts.
fn record_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\r', '\n']).filter(|l| !l.is_empty())
}

/// Count occurrences of `delimiter` outside double-quoted sections.
fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for &b in line.as_bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}
