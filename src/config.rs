use std::env;
use std::path::PathBuf;

pub const DEFAULT_TITLE: &str = "Energie-Dashboard";
pub const DEFAULT_HEADER_ROW: usize = 2;

/// Log filter used by the binaries when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,csv_dashboard=debug";

/// Defaults for the report front-ends, overridable per invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub title: String,
    pub header_row: usize,
    pub output: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            header_row: DEFAULT_HEADER_ROW,
            output: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Config {
            title: lookup("DASHBOARD_TITLE")
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            header_row: lookup("DASHBOARD_HEADER_ROW")
                .and_then(|v| v.trim().parse().ok())
                .filter(|row| *row >= 1)
                .unwrap_or(DEFAULT_HEADER_ROW),
            output: lookup("DASHBOARD_OUTPUT")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}
