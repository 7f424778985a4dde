use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use csv_dashboard::clean::clean;
use csv_dashboard::coerce::plan_columns;
use csv_dashboard::config::{Config, DEFAULT_LOG_FILTER};
use csv_dashboard::ingest::load_csv;

#[derive(Parser)]
#[command(name = "inspect-csv")]
#[command(about = "Show how a CSV export is read and which columns would be charted", long_about = None)]
struct Cli {
    /// Path to the CSV file
    csv: PathBuf,

    /// 1-based row number of the header row
    #[arg(long)]
    header_row: Option<usize>,

    /// Number of data rows to print
    #[arg(long, default_value = "5")]
    rows: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Loader diagnostics go to stderr next to the report on stdout
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
    let cli = Cli::parse();
    let header_row = cli.header_row.unwrap_or(Config::from_env().header_row);

    println!("Opening CSV export: {}", cli.csv.display());
    let loaded = load_csv(&cli.csv, header_row)?;

    println!("Encoding:  {}", loaded.encoding);
    println!("Delimiter: {:?}", loaded.delimiter as char);
    println!("Header row {header_row}, {} data rows", loaded.table.rows.len());
    println!("{}", "=".repeat(100));

    for (idx, name) in loaded.table.headers.iter().enumerate() {
        println!("Col {:3}: {name}", idx + 1);
    }

    println!("\nFirst {} data rows:", cli.rows);
    println!("{}", "=".repeat(100));
    for (row_idx, row) in loaded.table.rows.iter().enumerate().take(cli.rows) {
        print!("Row {:3}: ", row_idx + 1);
        for cell in row {
            if cell.trim().is_empty() {
                print!("[empty] ");
            } else {
                print!("[{cell}] ");
            }
        }
        println!();
    }

    let cleaned = clean(loaded.table)?;
    println!(
        "\n{} rows with a parseable date, classification:",
        cleaned.row_count()
    );
    println!("{}", "=".repeat(100));
    for plan in plan_columns(&cleaned) {
        println!("  {:<40} {}", plan.name, plan.kind);
    }

    Ok(())
}
