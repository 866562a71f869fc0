// Sparse term-weighting vectorization.

pub mod analyzer;
pub mod tfidf;
