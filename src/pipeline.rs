use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument};

use crate::chart::build_all;
use crate::clean::clean;
use crate::coerce::coerce_and_select;
use crate::error::DashboardError;
use crate::ingest::load_csv;
use crate::render::render;

/// Report path used when the caller gives none: `export.csv` becomes `export.dashboard.html`.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("dashboard.html")
}

/// Convert a CSV export into a dashboard document and return where it was written.
///
/// Stages run strictly in order:
/// 1. Load (encoding and delimiter detection, header row)
/// 2. Clean (text normalization, annotation rows, date parsing)
/// 3. Coerce and select numeric columns
/// 4. Build one series per column
/// 5. Render and write the document
///
/// Any failure aborts the run before the output file is touched.
#[instrument(skip_all, fields(input = %input.display(), header_row = header_row))]
pub fn generate(
    input: &Path,
    output: Option<&Path>,
    title: &str,
    header_row: usize,
) -> Result<PathBuf, DashboardError> {
    if header_row < 1 {
        return Err(DashboardError::InvalidHeaderRow(header_row));
    }

    let start_time = Instant::now();

    let loaded = load_csv(input, header_row).map_err(|source| DashboardError::Ingestion {
        path: input.to_path_buf(),
        source,
    })?;
    let cleaned = clean(loaded.table)?;
    let numeric = coerce_and_select(cleaned)?;
    let series = build_all(&numeric);

    let destination = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(input));
    let written = render(title, &series, &destination)?;

    info!(
        "Generated dashboard with {} chart(s) from {} row(s) in {:?}",
        series.len(),
        numeric.row_count(),
        start_time.elapsed()
    );
    Ok(written)
}
