//! HTTP prediction service
//!
//! One request, one record: validate, derive the nine log features,
//! scale, score, answer `{"anomaly": bool}`. The fitted artifacts are
//! loaded once at startup and shared read-only across requests.

mod error;

pub use error::ServiceError;

use anyhow::{ensure, Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{debug, warn};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::data::MarketRecord;
use crate::features::{feature_matrix, FEATURE_NAMES};
use crate::model::{
    IsolationForest, ModelStore, StandardScaler, DETECTOR_ARTIFACT, SCALER_ARTIFACT,
};

/// Shared, immutable state: the fitted artifacts.
pub struct AppState {
    pub scaler: StandardScaler,
    pub detector: IsolationForest,
}

impl AppState {
    /// Load both artifacts from the store and check that they agree
    /// with the feature contract before serving anything.
    pub fn load(store: &ModelStore) -> Result<Arc<Self>> {
        let scaler: StandardScaler = store
            .load(SCALER_ARTIFACT)
            .with_context(|| format!("loading '{SCALER_ARTIFACT}' from {}", store.root().display()))?;
        let detector: IsolationForest = store
            .load(DETECTOR_ARTIFACT)
            .with_context(|| {
                format!("loading '{DETECTOR_ARTIFACT}' from {}", store.root().display())
            })?;

        let expected = FEATURE_NAMES.len();
        ensure!(
            scaler.dim() == Some(expected),
            "scaler expects {:?} columns, service derives {expected}",
            scaler.dim()
        );
        ensure!(
            detector.dim() == Some(expected),
            "detector expects {:?} features, service derives {expected}",
            detector.dim()
        );

        Ok(Arc::new(Self { scaler, detector }))
    }

    pub fn new(scaler: StandardScaler, detector: IsolationForest) -> Arc<Self> {
        Arc::new(Self { scaler, detector })
    }
}

/// Build the service router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// POST /predict: score one market record.
async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MarketRecord>, JsonRejection>,
) -> Result<Json<Value>, ServiceError> {
    let Json(record) = payload.map_err(|e| ServiceError::Validation(e.body_text()))?;

    let anomaly = predict_record(&state, &record).inspect_err(|e| warn!("predict failed: {e}"))?;

    debug!("prediction: anomaly={anomaly}");
    Ok(Json(json!({ "anomaly": anomaly })))
}

/// The full inference pipeline for one record.
///
/// Internally batch-shaped (a 1×9 matrix flows through the scaler and
/// the forest); only the first label is reported.
pub fn predict_record(state: &AppState, record: &MarketRecord) -> Result<bool, ServiceError> {
    record.validate()?;

    let features = feature_matrix(std::slice::from_ref(record))?;
    let scaled = state.scaler.transform(&features)?;
    let labels = state.detector.predict(&scaled)?;

    // -1 = anomalous, +1 = normal.
    labels
        .first()
        .map(|&label| label == -1)
        .ok_or_else(|| ServiceError::Inference("detector returned no labels".to_string()))
}
