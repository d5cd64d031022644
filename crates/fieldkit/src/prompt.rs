//! Extraction prompt construction

/// Maximum number of page text characters sent to the completion provider
pub const MAX_TEXT_CHARS: usize = 3000;

/// Truncate text to its first `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Build the extraction prompt for the given fields and page text
///
/// The page text is cut to [`MAX_TEXT_CHARS`] before it is embedded.
pub fn build_prompt(fields: &[String], text: &str) -> String {
    format!(
        "Extract the following information from the given text: {}. \n    Text: {}",
        fields.join(", "),
        truncate_chars(text, MAX_TEXT_CHARS)
    )
}
