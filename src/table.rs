// Tabular data handed between pipeline stages.
//
// RawTable is the loader's untyped view (header + string cells). NormalizedTable
// pairs a parsed date column with value columns sharing the same row index; the
// cleaner produces it with text cells and the coercer with numeric cells.

use chrono::NaiveDateTime;

/// Name of the mandatory timestamp column.
pub const DATE_COLUMN: &str = "Datum";

#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Column names from the declared header row, already trimmed and made unique.
    pub headers: Vec<String>,
    /// Data rows after the header, each padded to `headers.len()` cells.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// A named column of values indexed by row.
#[derive(Debug, Clone, PartialEq)]
pub struct Column<V> {
    pub name: String,
    pub values: Vec<V>,
}

impl<V> Column<V> {
    pub fn new(name: impl Into<String>, values: Vec<V>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable<V> {
    pub dates: Column<NaiveDateTime>,
    /// Value columns in original encounter order, excluding the date column.
    pub columns: Vec<Column<V>>,
}

/// Output of the cleaner: text cells, `None` marks a missing value.
pub type CleanTable = NormalizedTable<Option<String>>;

/// Output of the coercer: numeric cells, `None` marks a missing value.
pub type NumericTable = NormalizedTable<Option<f64>>;

impl<V> NormalizedTable<V> {
    pub fn row_count(&self) -> usize {
        self.dates.values.len()
    }

    /// Date column first, then value columns in order.
    pub fn column_names(&self) -> Vec<&str> {
        std::iter::once(self.dates.name.as_str())
            .chain(self.columns.iter().map(|c| c.name.as_str()))
            .collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column<V>> {
        self.columns.iter().find(|c| c.name == name)
    }
}
