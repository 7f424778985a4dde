use chrono::NaiveDateTime;
use regex::Regex;

use crate::chart::{DATE_AXIS_LABEL, VALUE_AXIS_PLACEHOLDER};
use crate::table::{Column, NumericTable};

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartStyle {
    /// Connected line with a marker on every present point.
    LinesAndMarkers,
}

impl ChartStyle {
    pub fn mode(self) -> &'static str {
        match self {
            ChartStyle::LinesAndMarkers => "lines+markers",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: NaiveDateTime,
    /// `None` is drawn as a gap, never as zero.
    pub value: Option<f64>,
}

/// One chart: a value column paired with the date column.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    name: String,
    unit: String,
    points: Vec<SeriesPoint>,
}

impl ChartSeries {
    pub fn new(name: impl Into<String>, points: Vec<SeriesPoint>) -> Self {
        let name = name.into();
        Self {
            unit: infer_unit(&name),
            name,
            points,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.name
    }

    /// Unit taken from the column name, empty if there is none.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn x_axis_label(&self) -> &'static str {
        DATE_AXIS_LABEL
    }

    pub fn y_axis_label(&self) -> &str {
        if self.unit.is_empty() {
            VALUE_AXIS_PLACEHOLDER
        } else {
            &self.unit
        }
    }

    pub fn style(&self) -> ChartStyle {
        ChartStyle::LinesAndMarkers
    }
}

/// Text between the first `(` and the first `)` of a column name.
///
/// # Examples
///
/// ```
/// use csv_dashboard::chart::infer_unit;
///
/// assert_eq!(infer_unit("Leistung (kW)"), "kW");
/// assert_eq!(infer_unit("Zählerstand"), "");
/// ```
pub fn infer_unit(column_name: &str) -> String {
    unit_of(column_name).unwrap_or_default()
}

fn unit_of(column_name: &str) -> Option<String> {
    // Anchored so a `)` before the first `(` yields no unit
    let re = Regex::new(r"^[^()]*\(([^)]*)\)").ok()?;
    let caps = re.captures(column_name)?;
    Some(caps.get(1)?.as_str().to_string())
}

fn series_from(dates: &Column<NaiveDateTime>, column: &Column<Option<f64>>) -> ChartSeries {
    let points = dates
        .values
        .iter()
        .zip(&column.values)
        .map(|(timestamp, value)| SeriesPoint {
            timestamp: *timestamp,
            value: *value,
        })
        .collect();
    ChartSeries::new(column.name.clone(), points)
}

/// Build the series for `column_name`, `None` if the table has no such value column.
pub fn build_series(table: &NumericTable, column_name: &str) -> Option<ChartSeries> {
    table
        .column(column_name)
        .map(|column| series_from(&table.dates, column))
}

/// One series per value column, in column order.
pub fn build_all(table: &NumericTable) -> Vec<ChartSeries> {
    table
        .columns
        .iter()
        .map(|column| series_from(&table.dates, column))
        .collect()
}
