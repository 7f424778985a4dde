use csv::{ReaderBuilder, StringRecord};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ingest::delimiter::detect_delimiter;
use crate::ingest::encoding::{TextEncoding, ENCODINGS};
use crate::table::RawTable;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Input is not valid {0}")]
    Undecodable(&'static str),

    #[error("Could not determine the field delimiter")]
    UnknownDelimiter,

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Header row {row} not found, input has {available} non-empty rows")]
    MissingHeaderRow { row: usize, available: usize },

    #[error("Expected {expected} fields in line {line}, saw {found}")]
    RowTooLong {
        line: u64,
        expected: usize,
        found: usize,
    },
}

/// A parsed export together with the strategy choices that produced it.
#[derive(Debug, Clone)]
pub struct LoadedCsv {
    pub table: RawTable,
    pub encoding: TextEncoding,
    pub delimiter: u8,
}

/// Read a CSV export from disk. `header_row` is 1-based and counts non-empty lines.
pub fn load_csv(path: impl AsRef<Path>, header_row: usize) -> Result<LoadedCsv, LoadError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    load_bytes(&bytes, header_row)
}

/// Decode and parse raw bytes, trying each of [`ENCODINGS`] until one yields a table.
///
/// Returns the error of the last attempted encoding if all of them fail.
pub fn load_bytes(bytes: &[u8], header_row: usize) -> Result<LoadedCsv, LoadError> {
    let mut last_err = None;

    for encoding in ENCODINGS {
        match parse_with_encoding(bytes, encoding, header_row) {
            Ok(loaded) => {
                info!(
                    "Parsed CSV as {} with delimiter {:?}: {} columns, {} rows",
                    encoding,
                    loaded.delimiter as char,
                    loaded.table.headers.len(),
                    loaded.table.rows.len()
                );
                return Ok(loaded);
            }
            Err(e) => {
                warn!("Could not parse CSV as {}: {}", encoding, e);
                last_err = Some(e);
            }
        }
    }

    Err(last_err.unwrap_or(LoadError::Undecodable("any candidate encoding")))
}

fn parse_with_encoding(
    bytes: &[u8],
    encoding: TextEncoding,
    header_row: usize,
) -> Result<LoadedCsv, LoadError> {
    let text = encoding.decode(bytes)?;
    let delimiter = detect_delimiter(&text, header_row)?;
    let table = parse_table(&text, delimiter, header_row)?;
    Ok(LoadedCsv {
        table,
        encoding,
        delimiter,
    })
}

/// Split decoded text into a [`RawTable`], treating record `header_row` as column names.
///
/// Records before the header are discarded. Short rows are padded with empty
/// cells; long rows are an error unless the surplus cells are empty.
pub fn parse_table(text: &str, delimiter: u8, header_row: usize) -> Result<RawTable, LoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // preamble lines rarely match the header's field count
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let mut seen = 0;
    let header = loop {
        match records.next() {
            Some(record) => {
                let record = record?;
                seen += 1;
                if seen == header_row {
                    break record;
                }
            }
            None => {
                return Err(LoadError::MissingHeaderRow {
                    row: header_row,
                    available: seen,
                })
            }
        }
    };

    let headers = column_names(&header);
    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        rows.push(fit_row(&record, headers.len())?);
    }

    Ok(RawTable { headers, rows })
}

/// Trim header cells, name blank ones `Unnamed: <index>` and suffix duplicates with `.1`, `.2`, ...
fn column_names(header: &StringRecord) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(header.len());

    for (idx, raw) in header.iter().enumerate() {
        let trimmed = raw.trim();
        let base = if trimmed.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            trimmed.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while used.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        used.insert(name.clone());
        names.push(name);
    }

    names
}

fn fit_row(record: &StringRecord, width: usize) -> Result<Vec<String>, LoadError> {
    if record.len() > width && record.iter().skip(width).any(|cell| !cell.trim().is_empty()) {
        return Err(LoadError::RowTooLong {
            line: record.position().map(|p| p.line()).unwrap_or(0),
            expected: width,
            found: record.len(),
        });
    }

    let mut row: Vec<String> = record.iter().take(width).map(str::to_string).collect();
    row.resize(width, String::new());
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_row_two_skips_preamble() {
        let text = "Lastgang Zähler 4711\nDatum;Leistung (kW)\n01.01.2024;1,00\n02.01.2024;2,50\n";
        let table = parse_table(text, b';', 2).unwrap();

        assert_eq!(table.headers, vec!["Datum", "Leistung (kW)"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["02.01.2024", "2,50"]);
    }

    #[test]
    fn test_header_names_are_trimmed_and_unique() {
        let text = " Datum ; Wert ;Wert;;Wert\n";
        let table = parse_table(text, b';', 1).unwrap();
        assert_eq!(
            table.headers,
            vec!["Datum", "Wert", "Wert.1", "Unnamed: 3", "Wert.2"]
        );
    }

    #[test]
    fn test_short_rows_are_padded() {
        let text = "Datum;A;B\n01.01.2024;1\n";
        let table = parse_table(text, b';', 1).unwrap();
        assert_eq!(table.rows[0], vec!["01.01.2024", "1", ""]);
    }

    #[test]
    fn test_trailing_empty_fields_are_dropped() {
        let text = "Datum;A\n01.01.2024;1;;\n";
        let table = parse_table(text, b';', 1).unwrap();
        assert_eq!(table.rows[0], vec!["01.01.2024", "1"]);
    }

    #[test]
    fn test_long_rows_fail() {
        let text = "Datum;A\n01.01.2024;1;2\n";
        match parse_table(text, b';', 1) {
            Err(LoadError::RowTooLong {
                line,
                expected,
                found,
            }) => {
                assert_eq!(line, 2);
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("Expected RowTooLong error, got {other:?}"),
        }
    }

    #[test]
    fn test_carriage_return_only_export() {
        let bytes = b"Export\rDatum;Leistung (kW)\r01.01.2024;1,0\r02.01.2024;2,0\r";
        let loaded = load_bytes(bytes, 2).unwrap();

        assert_eq!(loaded.delimiter, b';');
        assert_eq!(loaded.table.headers, vec!["Datum", "Leistung (kW)"]);
        assert_eq!(loaded.table.rows.len(), 2);
        assert_eq!(loaded.table.rows[1], vec!["02.01.2024", "2,0"]);
    }

    #[test]
    fn test_missing_header_row() {
        let text = "Datum;A\n";
        assert!(matches!(
            parse_table(text, b';', 3),
            Err(LoadError::MissingHeaderRow {
                row: 3,
                available: 1
            })
        ));
    }

    #[test]
    fn test_falls_back_to_cp1252() {
        let bytes = b"Export\nDatum;Temperatur (\xB0C)\n01.01.2024;4,5\n";
        let loaded = load_bytes(bytes, 2).unwrap();

        assert_eq!(loaded.encoding, TextEncoding::Windows1252);
        assert_eq!(loaded.delimiter, b';');
        assert_eq!(loaded.table.headers[1], "Temperatur (°C)");
    }

    #[test]
    fn test_utf8_preferred() {
        let bytes = "\u{feff}Datum;Temperatur (°C)\n01.01.2024;4,5\n".as_bytes();
        let loaded = load_bytes(bytes, 1).unwrap();

        assert_eq!(loaded.encoding, TextEncoding::Utf8Sig);
        assert_eq!(loaded.table.headers, vec!["Datum", "Temperatur (°C)"]);
    }

    #[test]
    fn test_last_error_is_reported() {
        let bytes = b"Datum\n01.01.2024\n";
        assert!(matches!(
            load_bytes(bytes, 1),
            Err(LoadError::UnknownDelimiter)
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = load_csv("/nonexistent/path/to/export.csv", 2);
        assert!(matches!(result, Err(LoadError::Read(_))));
    }
}
