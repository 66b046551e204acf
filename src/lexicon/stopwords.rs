//! Stop-word sets.
//!
//! Built-in lists come from the `stop-words` crate (NLTK lists); custom lists
//! are parsed from text files. Membership is an exact, case-sensitive match.
//! Callers lowercase tokens before asking, and the stored entries are lowercase.

use std::collections::HashSet;
use stop_words::{get, LANGUAGE};

/// Immutable set of lowercase stop words for one language.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    language: String,
    words: HashSet<String>,
}

impl StopWords {
    /// Parse a word list: one entry per line, `#` starts a comment, blank lines ignored.
    pub fn parse(language: &str, content: &str) -> Self {
        let words = content
            .lines()
            .map(strip_comment)
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self {
            language: language.to_string(),
            words,
        }
    }

    /// NLTK list shipped with the `stop-words` crate. `None` for languages without one.
    pub fn builtin(language: &str) -> Option<Self> {
        let lang = match language.trim().to_lowercase().as_str() {
            "en" | "eng" | "english" => LANGUAGE::English,
            _ => return None,
        };
        Some(Self {
            language: language.trim().to_lowercase(),
            words: get(lang).iter().map(|w| w.to_lowercase()).collect(),
        })
    }

    pub fn from_list(language: &str, words: &[&str]) -> Self {
        Self {
            language: language.to_string(),
            words: words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Exact match: `"It"` is not a stop word even if `"it"` is.
    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

pub(crate) fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}
