// TF-IDF vectorization fit on a single batch.
//
// Each call derives its own vocabulary from the texts it is given and throws
// it away afterwards. Two batches therefore land in unrelated coordinate
// spaces: column 3 of one response has nothing to do with column 3 of
// another, and the same text can get a different vector depending on its
// neighbours. Callers comparing vectors across requests must send them in the
// same batch.
//
// Weighting is the smoothed variant: idf(t) = ln((1 + n) / (1 + df(t))) + 1,
// raw term counts for tf, and L2-normalized rows.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use super::analyzer::Analyzer;
use crate::error::VectorizeError;

/// Default cap on vocabulary size.
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// The fitted output of one batch: a dense document-term matrix plus the
/// vocabulary that labels its columns.
#[derive(Debug, Clone, Serialize)]
pub struct TfIdfMatrix {
    /// Column labels, sorted lexicographically.
    pub vocabulary: Vec<String>,
    /// One row per input text, in input order.
    pub rows: Vec<Vec<f64>>,
}

impl TfIdfMatrix {
    pub fn column_count(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Batch-local TF-IDF vectorizer. Holds configuration only; no fitted state
/// survives a call to [`TfIdfVectorizer::fit_transform`].
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    /// Keep at most this many terms, ranked by total count across the batch.
    pub max_features: usize,
    analyzer: Analyzer,
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}

impl TfIdfVectorizer {
    /// English stop words, the given vocabulary cap.
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            analyzer: Analyzer::default(),
        }
    }

    /// Replace the analyzer (e.g. a custom stop word list).
    pub fn with_analyzer(mut self, analyzer: Analyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Fit a vocabulary on `texts` and return their TF-IDF matrix.
    pub fn fit_transform(&self, texts: &[String]) -> Result<TfIdfMatrix, VectorizeError> {
        if texts.is_empty() {
            return Err(VectorizeError::EmptyBatch);
        }

        let documents: Vec<Vec<String>> = texts.iter().map(|t| self.analyzer.analyze(t)).collect();

        // Corpus-wide term counts (for max_features ranking) and document
        // frequencies (for idf).
        let mut totals: HashMap<&str, usize> = HashMap::new();
        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        for doc in &documents {
            let mut seen = HashSet::new();
            for term in doc {
                *totals.entry(term.as_str()).or_default() += 1;
                if seen.insert(term.as_str()) {
                    *document_frequency.entry(term.as_str()).or_default() += 1;
                }
            }
        }

        if totals.is_empty() {
            return Err(VectorizeError::EmptyVocabulary);
        }

        let distinct_terms = totals.len();
        let vocabulary = select_vocabulary(totals, self.max_features);
        let columns: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.as_str(), i))
            .collect();

        let n = texts.len() as f64;
        let idf: Vec<f64> = vocabulary
            .iter()
            .map(|term| {
                let df = document_frequency.get(term.as_str()).copied().unwrap_or(0) as f64;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        let rows: Vec<Vec<f64>> = documents
            .iter()
            .map(|doc| {
                let mut row = vec![0.0_f64; vocabulary.len()];
                for term in doc {
                    if let Some(&col) = columns.get(term.as_str()) {
                        row[col] += 1.0;
                    }
                }
                for (value, weight) in row.iter_mut().zip(&idf) {
                    *value *= weight;
                }
                l2_normalize(&mut row);
                row
            })
            .collect();

        debug!(
            documents = rows.len(),
            distinct_terms,
            vocabulary = vocabulary.len(),
            "Fitted batch-local TF-IDF"
        );

        Ok(TfIdfMatrix { vocabulary, rows })
    }
}

/// Keep the `max_features` most frequent terms (ties broken alphabetically),
/// then sort the survivors so column order is deterministic.
fn select_vocabulary(totals: HashMap<&str, usize>, max_features: usize) -> Vec<String> {
    let mut ranked: Vec<(&str, usize)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(max_features);

    let mut vocabulary: Vec<String> = ranked.into_iter().map(|(t, _)| t.to_string()).collect();
    vocabulary.sort();
    vocabulary
}

/// Scale a vector to unit Euclidean length. Zero vectors are left alone.
pub fn l2_normalize(values: &mut [f64]) {
    let norm = values.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for v in values.iter_mut() {
            *v /= norm;
        }
    }
}
