//! Log-space feature derivation
//!
//! Maps the six raw fields of a [`MarketRecord`] to the nine features
//! the scaler and detector were fitted on. The column order is part of
//! the model contract: a reordered matrix scales with the wrong factors
//! and nothing downstream will notice.

use ndarray::Array2;
use thiserror::Error;

use crate::data::{MarketRecord, CSV_COLUMNS};

/// Offset added before every log to keep a literal zero input defined.
pub const EPSILON: f64 = 1e-9;

/// Feature columns in the order the model artifacts expect them.
pub const FEATURE_NAMES: [&str; 9] = [
    "High_log",
    "Low_log",
    "Open_log",
    "Close_log",
    "Volume_log",
    "Marketcap_log",
    "log_return",
    "log_high_low_spread",
    "log_close_open_return",
];

/// Feature derivation failures.
#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("log transform undefined for {field} = {value}")]
    LogDomain { field: &'static str, value: f64 },
}

/// Nine derived log-space features for one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub high_log: f64,
    pub low_log: f64,
    pub open_log: f64,
    pub close_log: f64,
    pub volume_log: f64,
    pub marketcap_log: f64,
    pub log_return: f64,
    pub log_high_low_spread: f64,
    /// Identical in value to `log_return`. The fitted scaler expects
    /// nine columns in this exact order, so the duplicate is kept.
    pub log_close_open_return: f64,
}

impl FeatureVector {
    /// Derive the feature vector for one record.
    ///
    /// Deterministic and total for records where every field exceeds
    /// `-EPSILON`; anything at or below that bound is a log-domain
    /// error, never a silent NaN.
    pub fn derive(record: &MarketRecord) -> Result<Self, FeatureError> {
        let mut logs = [0.0_f64; 6];
        for ((field, value), slot) in CSV_COLUMNS
            .iter()
            .copied()
            .zip(record.values())
            .zip(logs.iter_mut())
        {
            let shifted = value + EPSILON;
            if shifted <= 0.0 {
                return Err(FeatureError::LogDomain { field, value });
            }
            *slot = shifted.ln();
        }

        let [high_log, low_log, open_log, close_log, volume_log, marketcap_log] = logs;

        Ok(Self {
            high_log,
            low_log,
            open_log,
            close_log,
            volume_log,
            marketcap_log,
            log_return: close_log - open_log,
            log_high_low_spread: high_log - low_log,
            log_close_open_return: close_log - open_log,
        })
    }

    /// Feature values in [`FEATURE_NAMES`] order.
    pub fn as_array(&self) -> [f64; 9] {
        [
            self.high_log,
            self.low_log,
            self.open_log,
            self.close_log,
            self.volume_log,
            self.marketcap_log,
            self.log_return,
            self.log_high_low_spread,
            self.log_close_open_return,
        ]
    }
}

/// Build the feature matrix (rows = records, columns = [`FEATURE_NAMES`])
/// for a batch of records. Fails on the first record with a log-domain
/// violation.
pub fn feature_matrix(records: &[MarketRecord]) -> Result<Array2<f64>, FeatureError> {
    let mut matrix = Array2::zeros((records.len(), FEATURE_NAMES.len()));

    for (i, record) in records.iter().enumerate() {
        let features = FeatureVector::derive(record)?;
        for (j, value) in features.as_array().into_iter().enumerate() {
            matrix[[i, j]] = value;
        }
    }

    Ok(matrix)
}
