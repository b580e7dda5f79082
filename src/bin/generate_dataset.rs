//! Generate a synthetic OHLCV dataset
//!
//! Usage: cargo run --bin generate_dataset -- --rows 1000 --output synthetic_data.csv

use anyhow::Result;
use clap::Parser;
use rust_anomaly_service::data::{generate, write_csv, SyntheticConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate a synthetic OHLCV dataset")]
struct Args {
    /// Number of rows to generate
    #[arg(short, long, default_value_t = 1000)]
    rows: usize,

    /// RNG seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Output file path (CSV)
    #[arg(short, long, default_value = "synthetic_data.csv")]
    output: String,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    println!("Synthetic Dataset Generator");
    println!("===========================");
    println!("Rows: {}", args.rows);
    println!("Seed: {}", args.seed);

    let config = SyntheticConfig {
        rows: args.rows,
        seed: args.seed,
        ..Default::default()
    };
    let records = generate(&config);

    if let Some(first) = records.first() {
        println!("\nFirst row:");
        println!(
            "  High: {:.2}  Low: {:.2}  Open: {:.2}  Close: {:.2}",
            first.high, first.low, first.open, first.close
        );
        println!(
            "  Volume: {:.2}  Marketcap: {:.2}",
            first.volume, first.marketcap
        );
    }

    write_csv(&args.output, &records)?;
    println!("\nSaved {} rows to: {}", records.len(), args.output);

    Ok(())
}
