// Neural embeddings: trait-based abstraction over the BERT encoder.
//
// The Embedder trait is what the web layer holds. OnnxEmbedder runs
// bert-base-uncased locally through ONNX Runtime; tests swap in stubs.

pub mod download;
pub mod onnx;
pub mod pooling;
pub mod traits;
