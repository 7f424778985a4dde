// Chart module
//
// Builds one time series per surviving value column. A series carries everything
// the renderer needs to draw it: title, axis labels, unit, and the points in
// table row order.

pub mod series;

pub use series::{build_all, build_series, infer_unit, ChartSeries, ChartStyle, SeriesPoint};

/// Label of the time axis on every chart.
pub const DATE_AXIS_LABEL: &str = "Datum";

/// Value axis label used when a column name carries no `(unit)`.
pub const VALUE_AXIS_PLACEHOLDER: &str = "Wert";
