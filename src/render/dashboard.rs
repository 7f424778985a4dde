use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::chart::ChartSeries;
use crate::error::DashboardError;
use crate::render::{html_escape, script_safe_json};

pub const STYLE_SHEET: &str = include_str!("assets/dashboard.css");
pub const CHART_RUNTIME: &str = include_str!("assets/chart_runtime.js");

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const LINE_WIDTH: u32 = 2;
const MARKER_SIZE: u32 = 6;

/// Chart description consumed by the embedded runtime.
#[derive(Debug, Serialize)]
struct ChartPayload<'a> {
    name: &'a str,
    title: &'a str,
    unit: &'a str,
    x_label: &'a str,
    y_label: &'a str,
    mode: &'a str,
    line_width: u32,
    marker_size: u32,
    x: Vec<String>,
    y: Vec<Option<f64>>,
}

impl<'a> From<&'a ChartSeries> for ChartPayload<'a> {
    fn from(series: &'a ChartSeries) -> Self {
        Self {
            name: series.name(),
            title: series.title(),
            unit: series.unit(),
            x_label: series.x_axis_label(),
            y_label: series.y_axis_label(),
            mode: series.style().mode(),
            line_width: LINE_WIDTH,
            marker_size: MARKER_SIZE,
            x: series
                .points()
                .iter()
                .map(|p| p.timestamp.format(TIMESTAMP_FORMAT).to_string())
                .collect(),
            y: series.points().iter().map(|p| p.value).collect(),
        }
    }
}

/// A fully assembled report, ready to be written once.
#[derive(Debug, Clone)]
pub struct Dashboard {
    title: String,
    fragments: Vec<String>,
    stylesheet: &'static str,
    runtime: &'static str,
}

impl Dashboard {
    pub fn new(title: &str, series: &[ChartSeries]) -> Result<Self, serde_json::Error> {
        let fragments = series
            .iter()
            .enumerate()
            .map(|(idx, s)| chart_fragment(idx, s))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            title: title.to_string(),
            fragments,
            stylesheet: STYLE_SHEET,
            runtime: CHART_RUNTIME,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// One card per chart, in series order.
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn to_html(&self) -> String {
        let cards: String = self
            .fragments
            .iter()
            .enumerate()
            .map(|(idx, fragment)| {
                // The runtime travels with the first card only
                let runtime = if idx == 0 {
                    format!("<script>{}</script>", self.runtime)
                } else {
                    String::new()
                };
                format!("<section class='card'>{runtime}{fragment}</section>")
            })
            .collect();

        let title = html_escape(&self.title);
        format!(
            r#"<!DOCTYPE html>
<html lang='de'>
<head>
  <meta charset='utf-8'/>
  <meta name='viewport' content='width=device-width, initial-scale=1'/>
  <title>{title}</title>
  <style>{css}</style>
</head>
<body>
  <h1>{title}</h1>
  <div class='grid'>
    {cards}
  </div>
</body>
</html>"#,
            css = self.stylesheet,
        )
    }
}

fn chart_fragment(idx: usize, series: &ChartSeries) -> Result<String, serde_json::Error> {
    let id = format!("chart-{idx}");
    let payload = serde_json::to_string(&ChartPayload::from(series))?;
    Ok(format!(
        "<div class='chart' id='{id}'></div>\
         <script type='application/json' id='{id}-data'>{data}</script>\
         <script>DashboardCharts.render('{id}');</script>",
        data = script_safe_json(&payload),
    ))
}

/// Assemble the dashboard for `series` and write it to `destination` in one write.
#[instrument(skip(title, series), fields(charts = series.len()))]
pub fn render(
    title: &str,
    series: &[ChartSeries],
    destination: &Path,
) -> Result<PathBuf, DashboardError> {
    let io_error = |source: io::Error| DashboardError::Io {
        path: destination.to_path_buf(),
        source,
    };

    let dashboard = Dashboard::new(title, series)?;
    let html = dashboard.to_html();
    debug!("Rendered {} chart fragments", dashboard.fragments().len());

    fs::write(destination, &html).map_err(io_error)?;
    info!(
        "Wrote dashboard ({} bytes) to {}",
        html.len(),
        destination.display()
    );
    Ok(destination.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::SeriesPoint;
    use chrono::NaiveDate;

    fn series(name: &str, values: &[Option<f64>]) -> ChartSeries {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, value)| SeriesPoint {
                timestamp: NaiveDate::from_ymd_opt(2024, 1, i as u32 + 1)
                    .unwrap()
                    .and_hms_opt(0, 15, 0)
                    .unwrap(),
                value: *value,
            })
            .collect();
        ChartSeries::new(name, points)
    }

    #[test]
    fn test_runtime_embedded_once() {
        let charts = vec![
            series("Leistung (kW)", &[Some(1.0), Some(2.0)]),
            series("Arbeit (kWh)", &[Some(3.0), None]),
            series("Zählerstand", &[Some(4.0), Some(5.0)]),
        ];
        let html = Dashboard::new("Test", &charts).unwrap().to_html();

        assert_eq!(html.matches("global.DashboardCharts =").count(), 1);
        assert_eq!(html.matches("<section class='card'>").count(), 3);
        let runtime_at = html.find("global.DashboardCharts =").unwrap();
        let second_card = html.match_indices("<section class='card'>").nth(1).unwrap().0;
        assert!(runtime_at < second_card);
    }

    #[test]
    fn test_fragment_payload() {
        let charts = vec![series("Leistung (kW)", &[Some(2.5), None])];
        let dashboard = Dashboard::new("Test", &charts).unwrap();
        let fragment = &dashboard.fragments()[0];

        assert!(fragment.contains("id='chart-0'"));
        assert!(fragment.contains(r#""title":"Leistung (kW)""#));
        assert!(fragment.contains(r#""y_label":"kW""#));
        assert!(fragment.contains(r#""x_label":"Datum""#));
        assert!(fragment.contains(r#""mode":"lines+markers""#));
        assert!(fragment.contains(r#""x":["2024-01-01 00:15:00","2024-01-02 00:15:00"]"#));
        assert!(fragment.contains(r#""y":[2.5,null]"#));
        assert!(!fragment.contains("DashboardCharts ="));
    }

    #[test]
    fn test_title_is_escaped() {
        let charts = vec![series("A", &[Some(1.0)])];
        let html = Dashboard::new("Strom & <Gas>", &charts).unwrap().to_html();

        assert!(html.contains("<title>Strom &amp; &lt;Gas&gt;</title>"));
        assert!(html.contains("<h1>Strom &amp; &lt;Gas&gt;</h1>"));
        assert!(!html.contains("<Gas>"));
    }

    #[test]
    fn test_column_names_cannot_break_out_of_script() {
        let charts = vec![series("x</script><script>alert(1)", &[Some(1.0)])];
        let html = Dashboard::new("T", &charts).unwrap().to_html();
        assert!(!html.contains("x</script>"));
    }

    #[test]
    fn test_document_is_self_contained() {
        let charts = vec![series("A", &[Some(1.0)])];
        let html = Dashboard::new("T", &charts).unwrap().to_html();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("minmax(360px,1fr)"));
        assert!(!html.contains("src="));
        assert!(!html.contains("https://"));
    }

    #[test]
    fn test_render_reports_io_error() {
        let charts = vec![series("A", &[Some(1.0)])];
        let destination = Path::new("/nonexistent/dir/report.html");

        match render("T", &charts, destination) {
            Err(DashboardError::Io { path, .. }) => assert_eq!(path, destination),
            other => panic!("Expected Io error, got {other:?}"),
        }
    }
}
