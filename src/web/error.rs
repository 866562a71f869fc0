// HTTP error mapping.
//
// Input problems (bad JSON, missing or mistyped `texts`, empty batch, empty
// vocabulary) are 400s. A body over the configured size limit is a 413. Tokenizer and runtime failures are 500s. Either way
// the body is `{"error": "<message>"}` and the whole batch fails.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

use crate::error::VectorizeError;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The body could not be parsed into `{"texts": [string, ...]}`.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The body exceeded TEXTVEC_MAX_BODY_BYTES.
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Vectorize(#[from] VectorizeError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Vectorize(e) if e.is_input_error() => StatusCode::BAD_REQUEST,
            ApiError::Vectorize(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            error!(error = %message, "Vectorization failed");
        } else {
            warn!(error = %message, "Rejected request");
        }

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_is_400() {
        let err = ApiError::InvalidRequest("missing field `texts`".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_payload_too_large_is_413() {
        let err = ApiError::PayloadTooLarge("length limit exceeded".into());
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_empty_batch_is_400() {
        let err = ApiError::from(VectorizeError::EmptyBatch);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_empty_vocabulary_is_400() {
        let err = ApiError::from(VectorizeError::EmptyVocabulary);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_inference_failure_is_500() {
        let err = ApiError::from(VectorizeError::Inference("oom".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "inference failed: oom");
    }

    #[test]
    fn test_response_status_matches() {
        let response = ApiError::from(VectorizeError::Worker("panicked".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
