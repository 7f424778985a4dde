use std::fmt;
use tracing::{debug, info};

use crate::error::DashboardError;
use crate::table::{CleanTable, Column, NormalizedTable, NumericTable};

/// Ways of turning a text column into numbers. The first one that accepts a
/// column is used for every cell of that column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericStrategy {
    /// Every present cell already parses as a plain number (`1234.56`).
    Direct,
    /// German formatting: `.` groups thousands, `,` is the decimal point (`1.234,56`).
    Locale,
}

pub const NUMERIC_STRATEGIES: [NumericStrategy; 2] =
    [NumericStrategy::Direct, NumericStrategy::Locale];

impl NumericStrategy {
    fn accepts(self, cells: &[Option<String>]) -> bool {
        match self {
            NumericStrategy::Direct => cells.iter().flatten().all(|c| c.parse::<f64>().is_ok()),
            NumericStrategy::Locale => true,
        }
    }

    /// Coerce one cell, `None` when it is not a finite number.
    pub fn coerce(self, cell: &str) -> Option<f64> {
        match self {
            NumericStrategy::Direct => finite(cell.parse().ok()),
            NumericStrategy::Locale => locale_to_f64(cell),
        }
    }

    fn select(cells: &[Option<String>]) -> Self {
        NUMERIC_STRATEGIES
            .iter()
            .copied()
            .find(|s| s.accepts(cells))
            .unwrap_or(NumericStrategy::Locale)
    }
}

/// Strip every `.` thousands separator, swap the `,` decimal separator for `.`, then parse.
pub fn locale_to_f64(cell: &str) -> Option<f64> {
    let swapped = cell.replace('.', "").replace(',', ".");
    finite(swapped.parse().ok())
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Classification decided once per column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Date,
    /// Charted; `positive` counts values strictly greater than zero.
    Numeric {
        strategy: NumericStrategy,
        positive: usize,
    },
    /// No coerced value is strictly greater than zero.
    Discarded { strategy: NumericStrategy },
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Date => write!(f, "date"),
            ColumnKind::Numeric { strategy, positive } => {
                write!(f, "numeric ({strategy:?}, {positive} values > 0)")
            }
            ColumnKind::Discarded { strategy } => {
                write!(f, "discarded ({strategy:?}, no values > 0)")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPlan {
    pub name: String,
    pub kind: ColumnKind,
}

fn classify(column: &Column<Option<String>>) -> (ColumnKind, Vec<Option<f64>>) {
    let strategy = NumericStrategy::select(&column.values);
    let values: Vec<Option<f64>> = column
        .values
        .iter()
        .map(|cell| cell.as_deref().and_then(|c| strategy.coerce(c)))
        .collect();

    let positive = values.iter().flatten().filter(|v| **v > 0.0).count();
    let kind = if positive > 0 {
        ColumnKind::Numeric { strategy, positive }
    } else {
        ColumnKind::Discarded { strategy }
    };
    (kind, values)
}

/// Classification of every column, date column first.
pub fn plan_columns(table: &CleanTable) -> Vec<ColumnPlan> {
    let date = ColumnPlan {
        name: table.dates.name.clone(),
        kind: ColumnKind::Date,
    };

    std::iter::once(date)
        .chain(table.columns.iter().map(|column| ColumnPlan {
            name: column.name.clone(),
            kind: classify(column).0,
        }))
        .collect()
}

/// Coerce value columns to numbers and keep those with at least one value > 0.
pub fn coerce_and_select(table: CleanTable) -> Result<NumericTable, DashboardError> {
    let NormalizedTable { dates, columns } = table;
    let mut selected = Vec::with_capacity(columns.len());

    for column in &columns {
        let (kind, values) = classify(column);
        debug!("Column {:?}: {}", column.name, kind);
        if let ColumnKind::Numeric { .. } = kind {
            selected.push(Column::new(column.name.clone(), values));
        }
    }

    if selected.is_empty() {
        return Err(DashboardError::Data);
    }

    info!(
        "Selected {} of {} value columns for charting",
        selected.len(),
        columns.len()
    );

    Ok(NormalizedTable {
        dates,
        columns: selected,
    })
}
