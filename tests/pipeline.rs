//! End-to-end tests for the training and serving pipeline
//!
//! Covers the full artifact lifecycle: generate data, derive features,
//! fit, persist, reload, predict.

use rust_anomaly_service::data::{generate, MarketRecord, SyntheticConfig};
use rust_anomaly_service::features::feature_matrix;
use rust_anomaly_service::model::{
    IsolationForest, ModelStore, StandardScaler, DETECTOR_ARTIFACT, SCALER_ARTIFACT,
};
use rust_anomaly_service::service::{predict_record, AppState, ServiceError};

/// Fit scaler + forest on a synthetic dataset and persist both.
fn train_into(store: &ModelStore, rows: usize) -> (StandardScaler, IsolationForest) {
    let records = generate(&SyntheticConfig {
        rows,
        ..Default::default()
    });
    let matrix = feature_matrix(&records).unwrap();

    let mut scaler = StandardScaler::new();
    let scaled = scaler.fit_transform(&matrix).unwrap();

    let mut detector = IsolationForest::new(100, 0.01);
    detector.fit(&scaled).unwrap();

    store.save(SCALER_ARTIFACT, &scaler).unwrap();
    store.save(DETECTOR_ARTIFACT, &detector).unwrap();

    (scaler, detector)
}

fn reference_record() -> MarketRecord {
    MarketRecord::new(67000.0, 66000.0, 66500.0, 66800.0, 3.4e9, 1.3e12)
}

#[test]
fn test_train_persist_load_predict() {
    let dir = tempfile::tempdir().unwrap();
    let store = ModelStore::new(dir.path());

    train_into(&store, 500);

    let state = AppState::load(&store).unwrap();
    let anomaly = predict_record(&state, &reference_record()).unwrap();

    // Same record, same artifacts, same answer.
    assert_eq!(anomaly, predict_record(&state, &reference_record()).unwrap());
}

#[test]
fn test_loaded_artifacts_match_in_memory_ones() {
    let dir = tempfile::tempdir().unwrap();
    let store = ModelStore::new(dir.path());

    let (scaler, detector) = train_into(&store, 400);
    let fresh = AppState::new(scaler, detector);
    let loaded = AppState::load(&store).unwrap();

    let probes = generate(&SyntheticConfig {
        rows: 50,
        seed: 7,
        ..Default::default()
    });
    for record in &probes {
        assert_eq!(
            predict_record(&fresh, record).unwrap(),
            predict_record(&loaded, record).unwrap()
        );
    }
}

#[test]
fn test_training_set_anomaly_rate_tracks_contamination() {
    let records = generate(&SyntheticConfig {
        rows: 500,
        ..Default::default()
    });
    let matrix = feature_matrix(&records).unwrap();

    let mut scaler = StandardScaler::new();
    let scaled = scaler.fit_transform(&matrix).unwrap();

    let mut detector = IsolationForest::new(100, 0.01);
    detector.fit(&scaled).unwrap();

    let labels = detector.predict(&scaled).unwrap();
    let anomalies = labels.iter().filter(|&&l| l == -1).count();

    // Threshold sits at the 1% quantile of training scores, so the
    // flagged share stays near 1% of 500 rows.
    assert!(anomalies >= 1, "no anomalies flagged at all");
    assert!(anomalies <= 25, "flagged {anomalies} of 500 rows");
}

#[test]
fn test_negative_field_is_computation_error_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let store = ModelStore::new(dir.path());
    train_into(&store, 300);

    let state = AppState::load(&store).unwrap();
    let mut record = reference_record();
    record.high = -1.0;

    assert!(matches!(
        predict_record(&state, &record),
        Err(ServiceError::Computation(_))
    ));
}

#[test]
fn test_zero_field_predicts_without_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = ModelStore::new(dir.path());
    train_into(&store, 300);

    let state = AppState::load(&store).unwrap();
    let mut record = reference_record();
    record.high = 0.0;

    assert!(predict_record(&state, &record).is_ok());
}

#[test]
fn test_load_fails_on_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = ModelStore::new(dir.path());
    assert!(AppState::load(&store).is_err());
}
