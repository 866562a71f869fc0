// Request body for both endpoints, and a JSON extractor that reports
// rejections through ApiError instead of axum's plain-text defaults.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::error::ApiError;
use crate::error::VectorizeError;

/// `{"texts": ["...", ...]}`
#[derive(Debug, Clone, Deserialize)]
pub struct TextBatch {
    pub texts: Vec<String>,
}

impl TextBatch {
    /// Empty batches are rejected on both endpoints.
    pub fn require_non_empty(&self) -> Result<(), ApiError> {
        if self.texts.is_empty() {
            return Err(VectorizeError::EmptyBatch.into());
        }
        Ok(())
    }
}

/// `axum::Json` with its rejection mapped to [`ApiError::InvalidRequest`],
/// or [`ApiError::PayloadTooLarge`] when the body limit was hit.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(invalid_request(rejection)),
        }
    }
}

fn invalid_request(rejection: JsonRejection) -> ApiError {
    // Content-type and syntax problems all stay 400; only the size limit
    // keeps axum's own status.
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::PayloadTooLarge(rejection.body_text());
    }
    ApiError::InvalidRequest(rejection.body_text())
}
