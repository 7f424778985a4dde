// Shared fixtures for the integration tests
#![allow(dead_code)]

use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A scratch directory holding one CSV export. Removed when dropped.
pub struct Fixture {
    pub dir: TempDir,
    pub csv: PathBuf,
}

impl Fixture {
    pub fn output(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

pub fn write_csv(contents: impl AsRef<[u8]>) -> Fixture {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let csv = dir.path().join("export.csv");
    fs::write(&csv, contents).expect("Failed to write CSV fixture");
    Fixture { dir, csv }
}

/// Chart payloads embedded in a rendered dashboard, in document order.
pub fn chart_payloads(html: &str) -> Vec<Value> {
    let mut payloads = Vec::new();
    let mut rest = html;
    while let Some(start) = rest.find("<script type='application/json'") {
        let after_tag = &rest[start..];
        let open_end = after_tag.find('>').expect("Unterminated script tag") + 1;
        let body = &after_tag[open_end..];
        let close = body.find("</script>").expect("Missing </script>");
        payloads.push(serde_json::from_str(&body[..close]).expect("Invalid chart JSON"));
        rest = &body[close..];
    }
    payloads
}

pub fn y_values(payload: &Value) -> Vec<Option<f64>> {
    payload["y"]
        .as_array()
        .expect("y must be an array")
        .iter()
        .map(Value::as_f64)
        .collect()
}

pub fn x_values(payload: &Value) -> Vec<String> {
    payload["x"]
        .as_array()
        .expect("x must be an array")
        .iter()
        .map(|v| v.as_str().expect("x must hold strings").to_string())
        .collect()
}
