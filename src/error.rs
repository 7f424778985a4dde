use std::path::PathBuf;

use crate::ingest::LoadError;

/// Failures surfaced by [`crate::pipeline::generate`]. Every variant aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Could not read CSV {path}: {source}")]
    Ingestion {
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    #[error("Column \"{0}\" is missing from the CSV")]
    Schema(String),

    #[error("No rows with a parseable date in column \"{0}\"")]
    Parse(String),

    #[error("No columns with values > 0,00 found")]
    Data,

    #[error("Failed to write dashboard to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize chart data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Header row must be 1 or greater, got {0}")]
    InvalidHeaderRow(usize),
}
