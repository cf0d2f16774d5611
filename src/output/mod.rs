// Output formatting: terminal display of score tables and projection labels.

pub mod terminal;

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Respects UTF-8 character boundaries, so multi-byte terms never panic.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_unchanged() {
        assert_eq!(truncate_chars("term", 10), "term");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo...");
    }
}
