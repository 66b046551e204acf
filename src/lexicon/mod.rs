//! Lexical Resource Provider.
//!
//! `LexicalResources` bundles the stop-word set, the lemmatizer and the stemmer
//! for one language. Build it once at startup (built-in data or a directory on
//! disk), then share it read-only: it is `Send + Sync` and never mutated.
//!
//! Built-in English: the NLTK stop-word list from the `stop-words` crate and a
//! verb lemma table. Noun and adjective reduction needs a resources directory.
//!
//! On-disk layout for [`LexicalResources::load_from_dir`]:
//! ```text
//! <dir>/stopwords/<language>.txt
//! <dir>/lemmas/verb.txt   (required)   <dir>/lemmas/verb.exc (optional)
//! <dir>/lemmas/noun.txt   (optional)   <dir>/lemmas/noun.exc (optional)
//! <dir>/lemmas/adj.txt    (optional)   <dir>/lemmas/adj.exc  (optional)
//! ```

pub mod lemmatizer;
pub mod stemmer;
pub mod stopwords;

use std::fs;
use std::io;
use std::path::Path;

use tracing::info;

pub use crate::error::ResourceError;
pub use lemmatizer::{LemmaTable, Lemmatizer, PartOfSpeech};
pub use stemmer::PorterStemmer;
pub use stopwords::StopWords;

const EN_VERB: &str = include_str!("../../data/lemmas/verb.txt");
const EN_VERB_EXC: &str = include_str!("../../data/lemmas/verb.exc");

/// Longest token (in chars) the lemmatizer and stemmer will try to reduce.
/// Longer tokens are not words; they pass through unchanged.
pub const MAX_REDUCIBLE_CHARS: usize = 64;

/// Immutable bundle of linguistic resources for one language.
#[derive(Debug, Clone)]
pub struct LexicalResources {
    language: String,
    stopwords: StopWords,
    lemmatizer: Lemmatizer,
    stemmer: PorterStemmer,
}

/// Canonical tag for the built-in language aliases.
fn canonical_language(language: &str) -> Option<&'static str> {
    match language.trim().to_ascii_lowercase().as_str() {
        "english" | "en" | "eng" => Some("english"),
        _ => None,
    }
}

impl LexicalResources {
    /// Assemble from already-loaded parts (tests, custom vocabularies).
    pub fn new(stopwords: StopWords, lemmatizer: Lemmatizer) -> Self {
        Self {
            language: stopwords.language().to_string(),
            stopwords,
            lemmatizer,
            stemmer: PorterStemmer::new(),
        }
    }

    /// Built-in resources. Only English ships built in, with a verb table only.
    pub fn load(language: &str) -> Result<Self, ResourceError> {
        let unavailable = || {
            ResourceError::unavailable(
                language,
                "no built-in resources for this language; configure a resources directory",
            )
        };
        let lang = canonical_language(language).ok_or_else(unavailable)?;
        let stopwords = StopWords::builtin(lang).ok_or_else(unavailable)?;

        let lemmatizer = Lemmatizer::new().with_table(
            PartOfSpeech::Verb,
            LemmaTable::parse(EN_VERB, Some(EN_VERB_EXC)),
        );

        let res = Self::new(stopwords, lemmatizer);
        info!(
            language = lang,
            stopwords = res.stopwords.len(),
            "loaded built-in lexical resources"
        );
        Ok(res)
    }

    /// Load from a resource directory (see module docs for the layout).
    pub fn load_from_dir(dir: &Path, language: &str) -> Result<Self, ResourceError> {
        let lang = canonical_language(language).unwrap_or(language.trim());
        if lang.is_empty() {
            return Err(ResourceError::unavailable(language, "empty language tag"));
        }

        let sw_path = dir.join("stopwords").join(format!("{lang}.txt"));
        let sw = read_required(&sw_path, lang)?;

        let mut lemmatizer = Lemmatizer::new();
        for pos in PartOfSpeech::ALL {
            let base = dir.join("lemmas").join(pos.file_stem());
            let lemmas_path = base.with_extension("txt");
            let lemmas = if pos == PartOfSpeech::Verb {
                Some(read_required(&lemmas_path, lang)?)
            } else {
                read_optional(&lemmas_path)?
            };
            let Some(lemmas) = lemmas else {
                continue;
            };
            let exc = read_optional(&base.with_extension("exc"))?;
            lemmatizer = lemmatizer.with_table(pos, LemmaTable::parse(&lemmas, exc.as_deref()));
        }

        let res = Self::new(StopWords::parse(lang, &sw), lemmatizer);
        info!(
            language = lang,
            dir = %dir.display(),
            stopwords = res.stopwords.len(),
            "loaded lexical resources from directory"
        );
        Ok(res)
    }

    /// Directory when configured, built-in data otherwise.
    pub fn load_configured(dir: Option<&Path>, language: &str) -> Result<Self, ResourceError> {
        match dir {
            Some(d) => Self::load_from_dir(d, language),
            None => Self::load(language),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn stopwords(&self) -> &StopWords {
        &self.stopwords
    }

    pub fn lemmatizer(&self) -> &Lemmatizer {
        &self.lemmatizer
    }

    pub fn stemmer(&self) -> &PorterStemmer {
        &self.stemmer
    }

    #[inline]
    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    #[inline]
    pub fn lemmatize(&self, word: &str, pos: PartOfSpeech) -> String {
        self.lemmatizer.lemmatize(word, pos)
    }

    #[inline]
    pub fn stem(&self, word: &str) -> String {
        self.stemmer.stem(word)
    }
}

fn read_required(path: &Path, language: &str) -> Result<String, ResourceError> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(s),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ResourceError::unavailable(
            language,
            format!("missing {}", path.display()),
        )),
        Err(source) => Err(ResourceError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, ResourceError> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ResourceError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}
