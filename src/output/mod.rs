// Output formatting for the CLI.

pub mod terminal;

/// Shorten `text` to `max_chars` characters plus "...". Counts chars, not bytes.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_unchanged() {
        assert_eq!(truncate_chars("clean", 10), "clean");
    }

    #[test]
    fn long_text_is_cut_on_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo...");
    }
}
