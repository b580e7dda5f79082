//! Train the anomaly detection model
//!
//! Fits the standard scaler and the isolation forest on a CSV dataset,
//! reports the training-set anomaly rate and score distribution, and
//! persists both artifacts to the model store.
//!
//! Usage: cargo run --bin train -- --input synthetic_data.csv --model-dir models

use anyhow::{ensure, Context, Result};
use clap::Parser;
use rust_anomaly_service::data::read_csv;
use rust_anomaly_service::features::{feature_matrix, FEATURE_NAMES};
use rust_anomaly_service::model::{
    IsolationForest, ModelStore, StandardScaler, DETECTOR_ARTIFACT, SCALER_ARTIFACT,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Train the anomaly detection model")]
struct Args {
    /// Input dataset (CSV with High,Low,Open,Close,Volume,Marketcap columns)
    #[arg(short, long, default_value = "synthetic_data.csv")]
    input: String,

    /// Model store directory
    #[arg(short, long, default_value = "models")]
    model_dir: String,

    /// Expected proportion of anomalies in the training data
    #[arg(short, long, default_value_t = 0.01)]
    contamination: f64,

    /// Number of trees in the forest
    #[arg(short, long, default_value_t = 100)]
    n_estimators: usize,

    /// Random seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    println!("Anomaly Model Training");
    println!("======================");
    println!("Input: {}", args.input);
    println!("Contamination: {:.2}%", args.contamination * 100.0);
    println!("Trees: {}", args.n_estimators);

    let records = read_csv(&args.input)
        .with_context(|| format!("reading dataset from {}", args.input))?;
    ensure!(!records.is_empty(), "dataset {} is empty", args.input);
    println!("\nLoaded {} records", records.len());

    let matrix = feature_matrix(&records).context("deriving features")?;
    println!("Derived {} features per record", FEATURE_NAMES.len());

    let mut scaler = StandardScaler::new();
    let scaled = scaler.fit_transform(&matrix)?;

    let mut detector =
        IsolationForest::new(args.n_estimators, args.contamination).with_seed(args.seed);
    detector.fit(&scaled)?;

    // Training-set report: label counts and decision-score spread.
    let labels = detector.predict(&scaled)?;
    let anomalies = labels.iter().filter(|&&l| l == -1).count();
    println!("\nTraining set labels:");
    println!("  normal:    {}", labels.len() - anomalies);
    println!("  anomalous: {}", anomalies);

    let mut scores: Vec<f64> = detector.decision_function(&scaled)?.to_vec();
    scores.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let quantile = |q: f64| scores[((scores.len() - 1) as f64 * q).round() as usize];
    println!("\nDecision scores (lower = more anomalous):");
    println!("  min: {:+.4}", scores[0]);
    println!("  q25: {:+.4}", quantile(0.25));
    println!("  med: {:+.4}", quantile(0.50));
    println!("  q75: {:+.4}", quantile(0.75));
    println!("  max: {:+.4}", scores[scores.len() - 1]);

    let store = ModelStore::new(&args.model_dir);
    store.save(SCALER_ARTIFACT, &scaler)?;
    store.save(DETECTOR_ARTIFACT, &detector)?;

    println!("\nSaved artifacts:");
    println!("  {}", store.path_for(SCALER_ARTIFACT).display());
    println!("  {}", store.path_for(DETECTOR_ARTIFACT).display());

    Ok(())
}
