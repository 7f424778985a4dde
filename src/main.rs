use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use csv_dashboard::config::{Config, DEFAULT_LOG_FILTER};
use csv_dashboard::generate;

#[derive(Parser)]
#[command(name = "csv-dashboard")]
#[command(about = "Turn a CSV measurement export into an interactive HTML dashboard with one time-series chart per column", long_about = None)]
struct Cli {
    /// Path to the CSV file (row 1 is usually a preamble, row 2 holds the column names)
    csv: String,

    /// Path of the HTML output (default: <csv>.dashboard.html)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Page title
    #[arg(long)]
    title: Option<String>,

    /// 1-based row number of the header row
    #[arg(long)]
    header_row: Option<usize>,
}

fn run(cli: Cli, config: Config) -> Result<PathBuf, Box<dyn std::error::Error>> {
    // Paths dropped into a terminal often arrive quoted
    let csv_path = PathBuf::from(cli.csv.trim().trim_matches('"'));
    if !csv_path.exists() {
        return Err(format!("File not found: {}", csv_path.display()).into());
    }

    let title = cli.title.unwrap_or(config.title);
    let header_row = cli.header_row.unwrap_or(config.header_row);
    let output = cli.output.or(config.output);

    info!("Generating dashboard for {}", csv_path.display());
    let written = generate(&csv_path, output.as_deref(), &title, header_row)?;
    Ok(written)
}

fn main() -> ExitCode {
    // Logs go to stderr, stdout carries the result line
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env();

    match run(Cli::parse(), config) {
        Ok(path) => {
            println!("OK: {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Dashboard generation failed: {e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
