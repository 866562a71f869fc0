// POST /generate-bert: one mean-pooled BERT embedding per text.

use axum::extract::State;
use axum::Json;
use tracing::info;

use crate::web::error::ApiError;
use crate::web::request::{TextBatch, ValidJson};
use crate::web::AppState;

pub async fn generate_bert(
    State(state): State<AppState>,
    ValidJson(batch): ValidJson<TextBatch>,
) -> Result<Json<Vec<Vec<f64>>>, ApiError> {
    batch.require_non_empty()?;

    let embeddings = state.embedder.embed_batch(&batch.texts).await?;

    info!(
        texts = embeddings.len(),
        dim = state.embedder.dimension(),
        "Generated BERT embeddings"
    );

    Ok(Json(embeddings))
}
