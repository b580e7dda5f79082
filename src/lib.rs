//! Anomaly detection for cryptocurrency market data
//!
//! Trains an isolation forest over log-transformed OHLCV features and
//! serves it over HTTP.
//!
//! # Modules
//!
//! - `data`: Market records, CSV I/O and the synthetic dataset generator
//! - `features`: Log-space feature derivation (the model's input contract)
//! - `model`: Standard scaler, isolation forest and the artifact store
//! - `service`: The axum prediction service
//! - `config`: Environment-based service configuration
//!
//! # Example
//!
//! ```no_run
//! use rust_anomaly_service::data::{generate, SyntheticConfig};
//! use rust_anomaly_service::features::feature_matrix;
//! use rust_anomaly_service::model::{IsolationForest, StandardScaler};
//!
//! let records = generate(&SyntheticConfig::default());
//! let matrix = feature_matrix(&records).unwrap();
//!
//! let mut scaler = StandardScaler::new();
//! let scaled = scaler.fit_transform(&matrix).unwrap();
//!
//! let mut detector = IsolationForest::new(100, 0.01);
//! detector.fit(&scaled).unwrap();
//! ```

pub mod config;
pub mod data;
pub mod features;
pub mod model;
pub mod service;
