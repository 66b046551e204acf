//! Individual normalization stages. Every function here is total: any string
//! in, a deterministic (possibly empty) result out.

use once_cell::sync::OnceCell;
use regex::Regex;

use crate::lexicon::{LexicalResources, PartOfSpeech};

/// Lowercase every character (full Unicode mapping).
pub fn case_fold(text: &str) -> String {
    text.to_lowercase()
}

/// Drop tokens whose exact text is a stop word. Runs before punctuation
/// stripping, so `"the,"` survives while `"the"` and `"it's"` do not.
pub fn filter_stopwords(tokens: Vec<String>, resources: &LexicalResources) -> Vec<String> {
    tokens
        .into_iter()
        .filter(|t| !resources.is_stopword(t))
        .collect()
}

fn non_word() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s]").unwrap())
}

/// Remove every character that is neither a word character nor whitespace.
pub fn strip_punctuation(token: &str) -> String {
    non_word().replace_all(token, "").into_owned()
}

pub fn strip_punctuation_all(tokens: Vec<String>) -> Vec<String> {
    tokens.iter().map(|t| strip_punctuation(t)).collect()
}

/// Every token under the same part of speech; no per-token tagging.
pub fn lemmatize_all(
    tokens: Vec<String>,
    resources: &LexicalResources,
    pos: PartOfSpeech,
) -> Vec<String> {
    tokens
        .iter()
        .map(|t| resources.lemmatize(t, pos))
        .collect()
}

pub fn stem_all(tokens: Vec<String>, resources: &LexicalResources) -> Vec<String> {
    tokens.iter().map(|t| resources.stem(t)).collect()
}
