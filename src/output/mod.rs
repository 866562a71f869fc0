// Output formatting helpers.

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing (`&text[..120]`), this respects UTF-8 character boundaries
/// and will never panic on multi-byte characters like emoji or accented letters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

/// Render a matrix as compact JSON for the CLI.
pub fn matrix_json(rows: &[Vec<f64>]) -> serde_json::Result<String> {
    serde_json::to_string(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_chars("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_multibyte_safe() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll...");
    }

    #[test]
    fn test_matrix_json_shape() {
        let json = matrix_json(&[vec![0.5, 1.0], vec![]]).unwrap();
        assert_eq!(json, "[[0.5,1.0],[]]");
    }
}
