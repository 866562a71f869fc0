// Tests against the real bert-base-uncased ONNX export.
//
// Ignored by default: they need the ~440 MB model on disk. Run with
//   textvec download-model && cargo test -- --ignored
// or point TEXTVEC_MODEL_DIR at an existing copy.

use std::path::PathBuf;

use textvec::embedding::download::{default_model_dir, model_files_present};
use textvec::embedding::onnx::{OnnxEmbedder, BERT_BASE_DIM, DEFAULT_MAX_TOKENS};
use textvec::embedding::traits::Embedder;
use textvec::error::VectorizeError;

fn model_dir() -> PathBuf {
    std::env::var("TEXTVEC_MODEL_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_model_dir())
}

fn load() -> OnnxEmbedder {
    let dir = model_dir();
    assert!(
        model_files_present(&dir),
        "model files missing in {}; run `textvec download-model`",
        dir.display()
    );
    OnnxEmbedder::load(&dir, DEFAULT_MAX_TOKENS).unwrap()
}

#[tokio::test]
#[ignore]
async fn hello_world_is_768_finite_values() {
    let embedder = load();
    assert_eq!(embedder.dimension(), BERT_BASE_DIM);

    let out = embedder
        .embed_batch(&["hello world".to_string()])
        .await
        .unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].len(), BERT_BASE_DIM);
    assert!(out[0].iter().all(|v| v.is_finite()));
}

#[tokio::test]
#[ignore]
async fn identical_requests_are_identical() {
    let embedder = load();
    let batch = vec!["the same sentence twice".to_string()];
    let first = embedder.embed_batch(&batch).await.unwrap();
    let second = embedder.embed_batch(&batch).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
#[ignore]
async fn texts_are_independent_of_their_batch() {
    let embedder = load();
    let alone = embedder
        .embed_batch(&["short".to_string()])
        .await
        .unwrap();
    let together = embedder
        .embed_batch(&[
            "a considerably longer neighbouring sentence with many tokens".to_string(),
            "short".to_string(),
        ])
        .await
        .unwrap();
    assert_eq!(alone[0], together[1]);
}

#[tokio::test]
#[ignore]
async fn long_text_is_truncated_not_rejected() {
    let embedder = load();
    let long = "word ".repeat(2000);
    let out = embedder.embed_batch(&[long, String::new()]).await.unwrap();
    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|v| v.len() == BERT_BASE_DIM));
}

#[tokio::test]
#[ignore]
async fn empty_batch_is_rejected() {
    let embedder = load();
    let err = embedder.embed_batch(&[]).await.unwrap_err();
    assert!(matches!(err, VectorizeError::EmptyBatch));
}
