//! Service error taxonomy
//!
//! Every failure inside the request path ends up here and is rendered
//! as `{"error": "<message>"}` with a non-200 status. Bad requests
//! (validation, log-domain) map to 400; a misassembled service
//! (configuration) or a failing model (inference) map to 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::data::RecordError;
use crate::features::FeatureError;
use crate::model::{ForestError, ScalerError};

/// Unified error type for prediction responses.
#[derive(Debug)]
pub enum ServiceError {
    /// Malformed, missing or non-finite input field.
    Validation(String),
    /// Feature derivation failed (log-domain violation).
    Computation(String),
    /// Artifact/feature shape disagreement.
    Configuration(String),
    /// The detector itself failed.
    Inference(String),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Computation(_) => StatusCode::BAD_REQUEST,
            Self::Configuration(_) | Self::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "validation_error: {msg}"),
            Self::Computation(msg) => write!(f, "computation_error: {msg}"),
            Self::Configuration(msg) => write!(f, "configuration_error: {msg}"),
            Self::Inference(msg) => write!(f, "inference_error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.to_string() });
        (self.status(), axum::Json(body)).into_response()
    }
}

impl From<RecordError> for ServiceError {
    fn from(e: RecordError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl From<FeatureError> for ServiceError {
    fn from(e: FeatureError) -> Self {
        Self::Computation(e.to_string())
    }
}

impl From<ScalerError> for ServiceError {
    fn from(e: ScalerError) -> Self {
        Self::Configuration(e.to_string())
    }
}

impl From<ForestError> for ServiceError {
    fn from(e: ForestError) -> Self {
        Self::Inference(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServiceError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::Computation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::Configuration("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServiceError::Inference("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
