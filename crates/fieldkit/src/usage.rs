//! Token usage and cost estimation
//!
//! Tokens here are whitespace-delimited words, not model tokens. The count
//! follows a `\s+` regex split: leading or trailing whitespace produces an
//! empty piece that still counts, and the empty string counts as one piece.

use crate::convert::is_js_whitespace;
use serde::{Deserialize, Serialize};

/// Flat price per counted token, in dollars
pub const COST_PER_TOKEN: f64 = 0.00002;

/// Estimated usage of one extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub total_cost: f64,
}

/// Count the pieces produced by splitting `text` on whitespace runs
pub fn count_tokens(text: &str) -> usize {
    let mut runs = 0;
    let mut in_run = false;
    for c in text.chars() {
        if is_js_whitespace(c) {
            if !in_run {
                runs += 1;
                in_run = true;
            }
        } else {
            in_run = false;
        }
    }
    runs + 1
}

/// Estimate usage for a prompt and the provider's answer
pub fn calculate_usage(prompt: &str, result: &str) -> Usage {
    let input_tokens = count_tokens(prompt);
    let output_tokens = count_tokens(result);
    Usage {
        input_tokens,
        output_tokens,
        total_cost: (input_tokens + output_tokens) as f64 * COST_PER_TOKEN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_tokens_simple() {
        assert_eq!(count_tokens("a b c"), 3);
        assert_eq!(count_tokens("d e"), 2);
        assert_eq!(count_tokens("single"), 1);
    }

    #[test]
    fn test_count_tokens_whitespace_runs() {
        assert_eq!(count_tokens("a   b\t\tc\n\nd"), 4);
        assert_eq!(count_tokens("a \u{a0} b"), 2);
        assert_eq!(count_tokens("a\u{feff}b"), 2);
    }

    #[test]
    fn test_count_tokens_next_line_is_not_whitespace() {
        assert_eq!(count_tokens("a\u{85}b"), 1);
        assert_eq!(count_tokens("a\u{85} b"), 2);
    }

    #[test]
    fn test_count_tokens_edge_pieces() {
        assert_eq!(count_tokens(""), 1);
        assert_eq!(count_tokens(" a"), 2);
        assert_eq!(count_tokens("a "), 2);
        assert_eq!(count_tokens("  a  "), 3);
        assert_eq!(count_tokens("   "), 2);
    }

    #[test]
    fn test_calculate_usage() {
        let usage = calculate_usage("a b c", "d e");
        assert_eq!(usage.input_tokens, 3);
        assert_eq!(usage.output_tokens, 2);
        assert!((usage.total_cost - 0.0001).abs() < 1e-12);
    }

    #[test]
    fn test_calculate_usage_counts_whole_prompt() {
        let prompt = crate::prompt::build_prompt(&["title".to_string()], "a b c");
        let usage = calculate_usage(&prompt, "Widget");
        // "Extract the following information from the given text: title." + "Text:" + 3 words
        assert_eq!(usage.input_tokens, 13);
        assert_eq!(usage.output_tokens, 1);
    }
}
