// Text analyzer for TF-IDF: lowercase, tokenize, drop stop words.
//
// Tokens are runs of two or more Unicode word characters, so single letters
// and punctuation never become vocabulary terms.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use stop_words::{get, LANGUAGE};

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid token pattern"));

/// Splits text into the terms the vectorizer counts.
#[derive(Debug, Clone)]
pub struct Analyzer {
    stop_words: HashSet<String>,
}

impl Default for Analyzer {
    /// NLTK's English stop words (the crate is built with only the `nltk`
    /// list). These are function words; content words such as "hello" or
    /// "information" stay in the vocabulary.
    fn default() -> Self {
        let stop_words: Vec<String> = get(LANGUAGE::English);
        Self::with_stop_words(stop_words)
    }
}

impl Analyzer {
    /// Build an analyzer with a custom stop word list. Entries are lowercased
    /// so they match the lowercased tokens.
    pub fn with_stop_words<I, S>(stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stop_words: stop_words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn is_stop_word(&self, term: &str) -> bool {
        self.stop_words.contains(term)
    }

    /// Analyze one text into its ordered list of terms (duplicates kept).
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        TOKEN_PATTERN
            .find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|term| !self.stop_words.contains(*term))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_stop_words() -> Analyzer {
        Analyzer::with_stop_words(Vec::<String>::new())
    }

    #[test]
    fn test_lowercases_and_splits() {
        let terms = no_stop_words().analyze("Hello, World! hello");
        assert_eq!(terms, vec!["hello", "world", "hello"]);
    }

    #[test]
    fn test_drops_single_characters() {
        let terms = no_stop_words().analyze("a b c de");
        assert_eq!(terms, vec!["de"]);
    }

    #[test]
    fn test_keeps_digits_and_underscores() {
        let terms = no_stop_words().analyze("version 42 snake_case");
        assert_eq!(terms, vec!["version", "42", "snake_case"]);
    }

    #[test]
    fn test_unicode_words() {
        let terms = no_stop_words().analyze("Café naïve résumé");
        assert_eq!(terms, vec!["café", "naïve", "résumé"]);
    }

    #[test]
    fn test_custom_stop_words_are_case_insensitive() {
        let analyzer = Analyzer::with_stop_words(["The", "AND"]);
        let terms = analyzer.analyze("the cat and the hat");
        assert_eq!(terms, vec!["cat", "hat"]);
        assert!(analyzer.is_stop_word("the"));
    }

    #[test]
    fn test_default_list_removes_common_english() {
        let analyzer = Analyzer::default();
        assert!(analyzer.is_stop_word("the"));
        assert!(analyzer.is_stop_word("and"));
        let terms = analyzer.analyze("the axolotl and the narwhal");
        assert_eq!(terms, vec!["axolotl", "narwhal"]);
    }

    #[test]
    fn test_default_list_keeps_content_words() {
        let analyzer = Analyzer::default();
        for word in ["hello", "world", "new", "home", "page", "information"] {
            assert!(!analyzer.is_stop_word(word), "{word} should not be a stop word");
        }
        assert_eq!(analyzer.analyze("Hello, World!"), vec!["hello", "world"]);
    }

    #[test]
    fn test_punctuation_only() {
        assert!(no_stop_words().analyze("!!! ... ???").is_empty());
    }
}
