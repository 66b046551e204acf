//! Whitespace tokenizer.
//!
//! Splits on runs of Unicode whitespace. Punctuation stays attached to its
//! neighbours (`"park,"`); it is stripped by a later pipeline stage.

/// Ordered tokens; empty or all-whitespace input yields an empty sequence.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}
