// textvec: text-to-vector HTTP service.
//
// This is the library root. `vectorize` holds the batch-local TF-IDF path,
// `embedding` the BERT path, and `web` the Axum routes that expose both.

pub mod config;
pub mod embedding;
pub mod error;
pub mod output;
pub mod vectorize;
pub mod web;
