//! Dictionary lemmatizer.
//!
//! Reduction for a given part of speech:
//! 1. irregular forms come from the exception table (`ran` → `run`);
//! 2. otherwise suffix-detachment rules produce candidates (`excited` → `excite`, `excit`),
//!    re-applied to their own output until something is found or forms run out;
//! 3. only candidates present in the lemma dictionary survive; the shortest wins
//!    (first one on ties). No survivor means the word is returned unchanged.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::stopwords::strip_comment;
use super::MAX_REDUCIBLE_CHARS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    #[default]
    Verb,
    #[serde(alias = "adjective")]
    Adj,
    #[serde(alias = "adverb")]
    Adv,
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 4] = [Self::Noun, Self::Verb, Self::Adj, Self::Adv];

    /// File stem used for on-disk tables (`verb.txt`, `verb.exc`).
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::Noun => "noun",
            Self::Verb => "verb",
            Self::Adj => "adj",
            Self::Adv => "adv",
        }
    }

    fn detachment_rules(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Noun => &[
                ("s", ""),
                ("ses", "s"),
                ("xes", "x"),
                ("zes", "z"),
                ("ches", "ch"),
                ("shes", "sh"),
                ("men", "man"),
                ("ies", "y"),
            ],
            Self::Verb => &[
                ("s", ""),
                ("ies", "y"),
                ("es", "e"),
                ("es", ""),
                ("ed", "e"),
                ("ed", ""),
                ("ing", "e"),
                ("ing", ""),
            ],
            Self::Adj => &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")],
            Self::Adv => &[],
        }
    }
}

/// Lemma dictionary + exception table for one part of speech.
#[derive(Debug, Clone, Default)]
pub struct LemmaTable {
    lemmas: HashSet<String>,
    exceptions: HashMap<String, Vec<String>>,
}

impl LemmaTable {
    /// `lemmas`: one lemma per line. `exceptions`: `inflected base [base...]` per line.
    pub fn parse(lemmas: &str, exceptions: Option<&str>) -> Self {
        let lemmas = lemmas
            .lines()
            .map(strip_comment)
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_lowercase)
            .collect();

        let mut exc = HashMap::new();
        for line in exceptions.unwrap_or_default().lines().map(strip_comment) {
            let mut parts = line.split_whitespace();
            let Some(inflected) = parts.next() else {
                continue;
            };
            let bases: Vec<String> = parts.map(str::to_lowercase).collect();
            if !bases.is_empty() {
                exc.insert(inflected.to_lowercase(), bases);
            }
        }

        Self {
            lemmas,
            exceptions: exc,
        }
    }

    pub fn contains(&self, lemma: &str) -> bool {
        self.lemmas.contains(lemma)
    }

    pub fn len(&self) -> usize {
        self.lemmas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }

    /// Keep dictionary lemmas, deduplicated, in first-seen order.
    fn known(&self, forms: &[String]) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for form in forms {
            if self.lemmas.contains(form) && !out.contains(form) {
                out.push(form.clone());
            }
        }
        out
    }
}

/// Immutable lemmatizer over per-POS tables.
#[derive(Debug, Clone, Default)]
pub struct Lemmatizer {
    tables: HashMap<PartOfSpeech, LemmaTable>,
}

impl Lemmatizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, pos: PartOfSpeech, table: LemmaTable) -> Self {
        self.tables.insert(pos, table);
        self
    }

    pub fn has_table(&self, pos: PartOfSpeech) -> bool {
        self.tables.contains_key(&pos)
    }

    /// Base form of `word` under `pos`; the word itself if no reduction is known.
    pub fn lemmatize(&self, word: &str, pos: PartOfSpeech) -> String {
        self.candidates(word, pos)
            .into_iter()
            .min_by_key(|c| c.chars().count())
            .unwrap_or_else(|| word.to_string())
    }

    /// All dictionary lemmas reachable from `word`, in discovery order.
    /// Tokens longer than [`MAX_REDUCIBLE_CHARS`] have none.
    pub fn candidates(&self, word: &str, pos: PartOfSpeech) -> Vec<String> {
        let Some(table) = self.tables.get(&pos) else {
            return Vec::new();
        };
        if word.chars().count() > MAX_REDUCIBLE_CHARS {
            return Vec::new();
        }

        if let Some(bases) = table.exceptions.get(word) {
            let mut forms = Vec::with_capacity(bases.len() + 1);
            forms.push(word.to_string());
            forms.extend(bases.iter().cloned());
            return table.known(&forms);
        }

        let rules = pos.detachment_rules();
        let mut forms = apply_rules(&[word.to_string()], rules);

        let mut first = Vec::with_capacity(forms.len() + 1);
        first.push(word.to_string());
        first.extend(forms.iter().cloned());
        let found = table.known(&first);
        if !found.is_empty() {
            return found;
        }

        while !forms.is_empty() {
            forms = apply_rules(&forms, rules);
            let found = table.known(&forms);
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }
}

/// One round of detachment over every form. Output is deduplicated so
/// overlapping rules (`es→e`, `es→`, `s→`) cannot multiply the frontier.
fn apply_rules(forms: &[String], rules: &[(&str, &str)]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for form in forms {
        for (suffix, replacement) in rules {
            if let Some(stem) = form.strip_suffix(suffix) {
                let next = format!("{stem}{replacement}");
                if seen.insert(next.clone()) {
                    out.push(next);
                }
            }
        }
    }
    out
}
