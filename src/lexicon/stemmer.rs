//! Suffix-stripping stemmer backed by `rust-stemmers` (Snowball English, the
//! revised Porter algorithm).
//!
//! Output is an approximate root, not necessarily a dictionary word:
//! `running` → `run`, `excited` → `excit`.

use once_cell::sync::Lazy;
use rust_stemmers::{Algorithm, Stemmer};

use super::MAX_REDUCIBLE_CHARS;

static ENGLISH: Lazy<Stemmer> = Lazy::new(|| Stemmer::create(Algorithm::English));

/// Deterministic, stateless stemmer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    pub fn new() -> Self {
        Self
    }

    /// Tokens longer than [`MAX_REDUCIBLE_CHARS`] are returned unchanged.
    pub fn stem(&self, word: &str) -> String {
        if word.chars().count() > MAX_REDUCIBLE_CHARS {
            return word.to_string();
        }
        ENGLISH.stem(word).into_owned()
    }
}
