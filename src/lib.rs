pub mod chart;
pub mod clean;
pub mod coerce;
pub mod config;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod render;
pub mod table;

pub use error::DashboardError;
pub use pipeline::{default_output_path, generate};
