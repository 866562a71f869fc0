// Typed error boundary for the two conversion paths.
//
// Library failures (tokenizer, ONNX Runtime, blocking worker) are mapped into
// these variants at the call site so nothing untyped reaches the HTTP layer.

use thiserror::Error;

/// Errors produced while turning a text batch into vectors.
#[derive(Error, Debug)]
pub enum VectorizeError {
    /// The request carried no texts.
    #[error("texts must contain at least one string")]
    EmptyBatch,

    /// Every token in the batch was a stop word or too short to count.
    #[error("empty vocabulary; the texts contain only stop words or single characters")]
    EmptyVocabulary,

    /// The tokenizer rejected a text.
    #[error("tokenization failed: {0}")]
    Tokenization(String),

    /// ONNX Runtime failed or produced an unusable output tensor.
    #[error("inference failed: {0}")]
    Inference(String),

    /// The blocking worker panicked or the session lock was poisoned.
    #[error("worker failed: {0}")]
    Worker(String),
}

impl VectorizeError {
    /// True when the caller sent something we can't vectorize, as opposed
    /// to the model or runtime failing underneath us.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::EmptyBatch | Self::EmptyVocabulary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors() {
        assert!(VectorizeError::EmptyBatch.is_input_error());
        assert!(VectorizeError::EmptyVocabulary.is_input_error());
    }

    #[test]
    fn test_library_errors_are_not_input_errors() {
        assert!(!VectorizeError::Tokenization("bad".into()).is_input_error());
        assert!(!VectorizeError::Inference("bad".into()).is_input_error());
        assert!(!VectorizeError::Worker("bad".into()).is_input_error());
    }

    #[test]
    fn test_display_includes_detail() {
        let err = VectorizeError::Inference("output tensor has rank 2".into());
        assert_eq!(err.to_string(), "inference failed: output tensor has rank 2");
    }
}
