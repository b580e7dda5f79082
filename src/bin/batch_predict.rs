//! Batch predictions against a running prediction service
//!
//! Reads a CSV dataset, posts each row to the /predict endpoint and
//! writes the rows back out with an extra `anomaly` column. Rows whose
//! request fails or whose response carries no prediction are skipped
//! with a warning, never written as nulls.
//!
//! Usage: cargo run --bin batch_predict -- --input synthetic_data.csv --output anomaly_predictions.csv

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use serde_json::Value;

use rust_anomaly_service::data::{read_csv, MarketRecord, CSV_COLUMNS};

#[derive(Parser, Debug)]
#[command(author, version, about = "Batch predictions against the anomaly service")]
struct Args {
    /// Input dataset (CSV)
    #[arg(short, long, default_value = "synthetic_data.csv")]
    input: String,

    /// Output file for predictions (CSV)
    #[arg(short, long, default_value = "anomaly_predictions.csv")]
    output: String,

    /// Prediction endpoint URL
    #[arg(short, long, default_value = "http://localhost:3000/predict")]
    url: String,
}

fn predict_row(
    client: &reqwest::blocking::Client,
    url: &str,
    record: &MarketRecord,
) -> Result<bool> {
    let response: Value = client.post(url).json(record).send()?.json()?;

    response
        .get("anomaly")
        .and_then(Value::as_bool)
        .with_context(|| format!("no anomaly flag in response: {response}"))
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    println!("Batch Prediction");
    println!("================");
    println!("Input: {}", args.input);
    println!("Endpoint: {}", args.url);

    let records = read_csv(&args.input)
        .with_context(|| format!("reading dataset from {}", args.input))?;
    println!("\nLoaded {} records", records.len());

    let client = reqwest::blocking::Client::new();

    let mut writer = csv::Writer::from_path(&args.output)?;
    let mut header: Vec<&str> = CSV_COLUMNS.to_vec();
    header.push("anomaly");
    writer.write_record(&header)?;

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let mut written = 0usize;
    for (i, record) in records.iter().enumerate() {
        match predict_row(&client, &args.url, record) {
            Ok(anomaly) => {
                let mut row: Vec<String> =
                    record.values().iter().map(|v| v.to_string()).collect();
                row.push(anomaly.to_string());
                writer.write_record(&row)?;
                written += 1;
            }
            Err(e) => warn!("row {i} skipped: {e}"),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    writer.flush()?;

    println!(
        "Wrote {} predictions to {} ({} rows skipped)",
        written,
        args.output,
        records.len() - written
    );

    Ok(())
}
