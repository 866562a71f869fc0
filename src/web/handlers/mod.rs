pub mod bert;
pub mod tfidf;
