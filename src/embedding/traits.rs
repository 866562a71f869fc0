// Embedder trait: the seam between the HTTP handlers and the model.

use async_trait::async_trait;

use crate::error::VectorizeError;

/// Turns texts into fixed-length dense vectors.
///
/// Implementations must be deterministic: the same text always maps to the
/// same vector, and each text's vector is independent of the rest of the
/// batch.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Length of every vector this embedder returns.
    fn dimension(&self) -> usize;

    /// Embed a batch, returning one vector per text in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, VectorizeError>;
}
