//! Market record data structures
//!
//! One OHLCV-plus-marketcap data point, as produced by the dataset
//! generator and accepted by the prediction endpoint.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// CSV column order used by the generator and the batch predictor.
pub const CSV_COLUMNS: [&str; 6] = ["High", "Low", "Open", "Close", "Volume", "Marketcap"];

/// Validation failures for a [`MarketRecord`].
///
/// Non-positive values are not rejected here; the log transform in the
/// feature deriver reports them as computation errors.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("field {0} is not a finite number")]
    NonFinite(&'static str),
}

/// Single market data point.
///
/// Field names are capitalized on the wire and in CSV headers, matching
/// the format the model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketRecord {
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Volume")]
    pub volume: f64,
    #[serde(rename = "Marketcap")]
    pub marketcap: f64,
}

impl MarketRecord {
    pub fn new(high: f64, low: f64, open: f64, close: f64, volume: f64, marketcap: f64) -> Self {
        Self {
            high,
            low,
            open,
            close,
            volume,
            marketcap,
        }
    }

    /// Raw field values in CSV column order.
    pub fn values(&self) -> [f64; 6] {
        [
            self.high,
            self.low,
            self.open,
            self.close,
            self.volume,
            self.marketcap,
        ]
    }

    /// Check that every field carries a finite number.
    pub fn validate(&self) -> Result<(), RecordError> {
        for (name, value) in CSV_COLUMNS.iter().copied().zip(self.values()) {
            if !value.is_finite() {
                return Err(RecordError::NonFinite(name));
            }
        }
        Ok(())
    }
}

/// Save records to a CSV file with the standard header.
pub fn write_csv(path: &str, records: &[MarketRecord]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(CSV_COLUMNS)?;
    for record in records {
        writer.write_record(record.values().map(|v| v.to_string()))?;
    }

    writer.flush()?;
    Ok(())
}

/// Load records from a CSV file written by [`write_csv`] (or any file
/// with the same six leading columns).
pub fn read_csv(path: &str) -> anyhow::Result<Vec<MarketRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();

    for result in reader.records() {
        let row = result?;

        let high: f64 = row[0].parse()?;
        let low: f64 = row[1].parse()?;
        let open: f64 = row[2].parse()?;
        let close: f64 = row[3].parse()?;
        let volume: f64 = row[4].parse()?;
        let marketcap: f64 = row[5].parse()?;

        records.push(MarketRecord::new(high, low, open, close, volume, marketcap));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MarketRecord {
        MarketRecord::new(67000.0, 66000.0, 66500.0, 66800.0, 3.4e9, 1.3e12)
    }

    #[test]
    fn test_valid_record() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_nan_field_rejected() {
        let mut record = sample();
        record.close = f64::NAN;
        assert!(matches!(
            record.validate(),
            Err(RecordError::NonFinite("Close"))
        ));
    }

    #[test]
    fn test_infinite_field_rejected() {
        let mut record = sample();
        record.marketcap = f64::INFINITY;
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_negative_value_passes_validation() {
        // Negative prices are caught later by the feature deriver, not here.
        let mut record = sample();
        record.high = -1.0;
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        for key in CSV_COLUMNS {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }
}
