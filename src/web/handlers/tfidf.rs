// POST /generate-tfidf: TF-IDF matrix fit on the request's batch.
//
// Returns one row per text; columns are the batch's own vocabulary, so rows
// from different requests are not comparable.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use tracing::info;

use crate::error::VectorizeError;
use crate::web::error::ApiError;
use crate::web::request::{TextBatch, ValidJson};
use crate::web::AppState;

pub async fn generate_tfidf(
    State(state): State<AppState>,
    ValidJson(batch): ValidJson<TextBatch>,
) -> Result<Json<Vec<Vec<f64>>>, ApiError> {
    batch.require_non_empty()?;

    let vectorizer = Arc::clone(&state.tfidf);
    let texts = batch.texts;
    let matrix = tokio::task::spawn_blocking(move || vectorizer.fit_transform(&texts))
        .await
        .map_err(|e| VectorizeError::Worker(format!("tf-idf task panicked: {e}")))??;

    info!(
        texts = matrix.rows.len(),
        columns = matrix.column_count(),
        "Generated TF-IDF vectors"
    );

    Ok(Json(matrix.rows))
}
