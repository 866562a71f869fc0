// Local BERT embedder using bert-base-uncased exported to ONNX.
//
// Each text is encoded on its own (truncated to max_tokens, never padded),
// pushed through the encoder, and its last_hidden_state is mean-pooled over
// the token axis. Texts never share a forward pass, so one text can't change
// another's vector.
//
// The session sits behind Arc<Mutex<Session>>: ort::Session::run takes
// &mut self, so concurrent requests serialize on the lock for the duration of
// a single forward pass and nothing else.

use std::fmt::Display;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use super::download::{MODEL_FILE, TOKENIZER_FILE};
use super::pooling::mean_pool;
use super::traits::Embedder;
use crate::error::VectorizeError;
use crate::output::truncate_chars;

/// Hidden size of bert-base-uncased.
pub const BERT_BASE_DIM: usize = 768;

/// Default truncation length in tokens, special tokens included.
pub const DEFAULT_MAX_TOKENS: usize = 128;

/// Position embeddings in bert-base-uncased; longer sequences fail at inference.
pub const BERT_MAX_POSITIONS: usize = 512;

/// Text used to probe the model's output width at load time.
const PROBE_TEXT: &str = "hello world";

/// BERT embedder backed by ONNX Runtime. Immutable after `load` apart from
/// the session's internal buffers, which the mutex guards.
pub struct OnnxEmbedder {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    dimension: usize,
}

impl OnnxEmbedder {
    /// Load the encoder and tokenizer from `model_dir`.
    ///
    /// Expects `model.onnx` and `tokenizer.json`. Runs one probe inference to
    /// learn the hidden size, so a broken export fails here rather than on the
    /// first request.
    pub fn load(model_dir: &Path, max_tokens: usize) -> Result<Self> {
        let model_path = model_dir.join(MODEL_FILE);
        let tokenizer_path = model_dir.join(TOKENIZER_FILE);

        if !model_path.exists() {
            anyhow::bail!(
                "Embedding model not found: {}\nRun `textvec download-model` to download it.",
                model_path.display()
            );
        }
        if !tokenizer_path.exists() {
            anyhow::bail!(
                "Embedding tokenizer not found: {}\nRun `textvec download-model` to download it.",
                tokenizer_path.display()
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| {
                format!(
                    "Failed to load embedding model from {}",
                    model_path.display()
                )
            })?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load embedding tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: max_tokens,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;
        tokenizer.with_padding(None);

        let session = Mutex::new(session);
        let probe = embed_one(&session, &tokenizer, PROBE_TEXT)
            .context("Probe inference failed; is this a BERT-style encoder export?")?;
        let dimension = probe.len();

        info!(
            model_dir = %model_dir.display(),
            dimension,
            max_tokens,
            "Loaded BERT embedding model"
        );

        Ok(Self {
            session: Arc::new(session),
            tokenizer: Arc::new(tokenizer),
            dimension,
        })
    }
}

#[async_trait]
impl Embedder for OnnxEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    /// Tokenization and inference run on a blocking thread so the async
    /// runtime stays free for other requests.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, VectorizeError> {
        if texts.is_empty() {
            return Err(VectorizeError::EmptyBatch);
        }

        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let texts = texts.to_vec();
        let dimension = self.dimension;

        tokio::task::spawn_blocking(move || {
            let mut embeddings = Vec::with_capacity(texts.len());
            for text in &texts {
                let embedding = embed_one(&session, &tokenizer, text)?;
                if embedding.len() != dimension {
                    return Err(VectorizeError::Inference(format!(
                        "expected {dimension}-dim output, got {}",
                        embedding.len()
                    )));
                }
                embeddings.push(embedding);
            }
            debug!(batch_size = embeddings.len(), dim = dimension, "Computed BERT embeddings");
            Ok(embeddings)
        })
        .await
        .map_err(|e| VectorizeError::Worker(format!("embedding task panicked: {e}")))?
    }
}

fn inference_error(e: impl Display) -> VectorizeError {
    VectorizeError::Inference(e.to_string())
}

/// Tokenize, run the encoder, and mean-pool a single text.
fn embed_one(
    session: &Mutex<Session>,
    tokenizer: &Tokenizer,
    text: &str,
) -> Result<Vec<f64>, VectorizeError> {
    let encoding = tokenizer.encode(text, true).map_err(|e| {
        VectorizeError::Tokenization(format!("{e} (text: {:?})", truncate_chars(text, 50)))
    })?;

    let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
    let attention_mask: Vec<i64> = encoding
        .get_attention_mask()
        .iter()
        .map(|&m| m as i64)
        .collect();
    let seq_len = input_ids.len();
    if seq_len == 0 {
        return Err(VectorizeError::Tokenization(
            "tokenizer produced an empty sequence".to_string(),
        ));
    }

    // Single-sentence input: segment ids are all zero.
    let token_type_ids = vec![0i64; seq_len];
    let shape = [1_i64, seq_len as i64];

    let input_ids_tensor = Tensor::from_array((shape, input_ids)).map_err(inference_error)?;
    let attention_mask_tensor =
        Tensor::from_array((shape, attention_mask.clone())).map_err(inference_error)?;
    let token_type_ids_tensor =
        Tensor::from_array((shape, token_type_ids)).map_err(inference_error)?;

    // Output 0 is last_hidden_state: [1, seq_len, hidden]
    let (dims, hidden_states) = {
        let mut session = session
            .lock()
            .map_err(|e| VectorizeError::Worker(format!("session lock poisoned: {e}")))?;

        let outputs = session
            .run(ort::inputs! {
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor
            })
            .map_err(inference_error)?;

        let (out_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(inference_error)?;

        (out_shape.iter().copied().collect::<Vec<i64>>(), data.to_vec())
    };

    let dim = match dims.as_slice() {
        [1, len, hidden] if *len as usize == seq_len && *hidden > 0 => *hidden as usize,
        other => {
            return Err(VectorizeError::Inference(format!(
                "unexpected last_hidden_state shape {other:?} for {seq_len} tokens"
            )))
        }
    };

    let pooled = mean_pool(&hidden_states, &attention_mask, seq_len, dim);
    if pooled.iter().any(|v| !v.is_finite()) {
        return Err(VectorizeError::Inference(
            "model produced non-finite values".to_string(),
        ));
    }

    Ok(pooled)
}
