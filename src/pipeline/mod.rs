//! Normalization Pipeline.
//!
//! A fixed, named stage order:
//!
//! `CaseFold → Tokenize → StopWordFilter → StripPunctuation → Lemmatize [→ Stem]`
//!
//! `PipelineConfig::stages()` is the single source of that order and
//! `normalize` simply walks it. The whole thing is a pure function of
//! `(text, resources, config)`: no I/O, no logging, no errors.

pub mod stages;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::lexicon::{LexicalResources, PartOfSpeech};
use crate::tokenize::tokenize;

pub use stages::{case_fold, filter_stopwords, strip_punctuation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    CaseFold,
    Tokenize,
    StopWordFilter,
    StripPunctuation,
    Lemmatize,
    Stem,
}

/// Whether stemming runs after lemmatization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StemMode {
    #[default]
    LemmatizeOnly,
    LemmatizeThenStem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    Tokens,
    #[default]
    Joined,
}

/// What to do with tokens that punctuation stripping empties (`"..."` → `""`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmptyTokenPolicy {
    #[default]
    Retain,
    Drop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PipelineConfig {
    #[serde(default)]
    pub stem_mode: StemMode,
    #[serde(default)]
    pub output: OutputMode,
    #[serde(default)]
    pub empty_tokens: EmptyTokenPolicy,
    #[serde(default)]
    pub lemma_pos: PartOfSpeech,
}

impl PipelineConfig {
    pub fn with_stem_mode(mut self, stem_mode: StemMode) -> Self {
        self.stem_mode = stem_mode;
        self
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    pub fn with_empty_tokens(mut self, policy: EmptyTokenPolicy) -> Self {
        self.empty_tokens = policy;
        self
    }

    /// The ordered stage list this configuration runs.
    pub fn stages(&self) -> Vec<Stage> {
        let mut stages = vec![
            Stage::CaseFold,
            Stage::Tokenize,
            Stage::StopWordFilter,
            Stage::StripPunctuation,
            Stage::Lemmatize,
        ];
        if self.stem_mode == StemMode::LemmatizeThenStem {
            stages.push(Stage::Stem);
        }
        stages
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NormalizedOutput {
    Tokens(Vec<String>),
    Joined(String),
}

impl NormalizedOutput {
    fn from_tokens(tokens: Vec<String>, mode: OutputMode) -> Self {
        match mode {
            OutputMode::Tokens => Self::Tokens(tokens),
            OutputMode::Joined => Self::Joined(tokens.join(" ")),
        }
    }

    pub fn as_tokens(&self) -> Option<&[String]> {
        match self {
            Self::Tokens(t) => Some(t),
            Self::Joined(_) => None,
        }
    }

    pub fn as_joined(&self) -> Option<&str> {
        match self {
            Self::Joined(s) => Some(s),
            Self::Tokens(_) => None,
        }
    }

    /// Joined form regardless of the variant.
    pub fn into_string(self) -> String {
        match self {
            Self::Joined(s) => s,
            Self::Tokens(t) => t.join(" "),
        }
    }
}

/// Token snapshot after one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageSnapshot {
    pub stage: Stage,
    pub tokens: Vec<String>,
}

/// Per-stage record of one normalization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trace {
    /// Input after case folding, before tokenization.
    pub folded: String,
    pub snapshots: Vec<StageSnapshot>,
    pub output: NormalizedOutput,
}

impl Trace {
    pub fn after(&self, stage: Stage) -> Option<&[String]> {
        self.snapshots
            .iter()
            .find(|s| s.stage == stage)
            .map(|s| s.tokens.as_slice())
    }
}

/// Intermediate value flowing between stages.
enum Value {
    Text(String),
    Tokens(Vec<String>),
}

impl Value {
    fn into_tokens(self) -> Vec<String> {
        match self {
            Value::Text(t) => tokenize(&t),
            Value::Tokens(t) => t,
        }
    }
}

fn run_stage(
    stage: Stage,
    value: Value,
    resources: &LexicalResources,
    config: &PipelineConfig,
) -> Value {
    match stage {
        Stage::CaseFold => match value {
            Value::Text(t) => Value::Text(stages::case_fold(&t)),
            Value::Tokens(t) => Value::Tokens(t.iter().map(|s| stages::case_fold(s)).collect()),
        },
        Stage::Tokenize => Value::Tokens(value.into_tokens()),
        Stage::StopWordFilter => {
            Value::Tokens(stages::filter_stopwords(value.into_tokens(), resources))
        }
        Stage::StripPunctuation => {
            let mut tokens = stages::strip_punctuation_all(value.into_tokens());
            if config.empty_tokens == EmptyTokenPolicy::Drop {
                tokens.retain(|t| !t.is_empty());
            }
            Value::Tokens(tokens)
        }
        Stage::Lemmatize => Value::Tokens(stages::lemmatize_all(
            value.into_tokens(),
            resources,
            config.lemma_pos,
        )),
        Stage::Stem => Value::Tokens(stages::stem_all(value.into_tokens(), resources)),
    }
}

fn run(
    text: &str,
    resources: &LexicalResources,
    config: &PipelineConfig,
    mut observe: impl FnMut(Stage, &Value),
) -> Vec<String> {
    let mut value = Value::Text(text.to_string());
    for stage in config.stages() {
        value = run_stage(stage, value, resources, config);
        observe(stage, &value);
    }
    value.into_tokens()
}

/// Normalize one document.
pub fn normalize(
    text: &str,
    resources: &LexicalResources,
    config: &PipelineConfig,
) -> NormalizedOutput {
    let tokens = run(text, resources, config, |_, _| {});
    NormalizedOutput::from_tokens(tokens, config.output)
}

/// Normalize and keep every intermediate token sequence.
pub fn normalize_trace(text: &str, resources: &LexicalResources, config: &PipelineConfig) -> Trace {
    let mut folded = String::new();
    let mut snapshots = Vec::new();
    let tokens = run(text, resources, config, |stage, value| match value {
        Value::Text(t) => folded = t.clone(),
        Value::Tokens(t) => snapshots.push(StageSnapshot {
            stage,
            tokens: t.clone(),
        }),
    });
    Trace {
        folded,
        snapshots,
        output: NormalizedOutput::from_tokens(tokens, config.output),
    }
}

/// Normalize many documents in parallel. Output order matches input order.
pub fn normalize_batch<S>(
    texts: &[S],
    resources: &LexicalResources,
    config: &PipelineConfig,
) -> Vec<NormalizedOutput>
where
    S: AsRef<str> + Sync,
{
    texts
        .par_iter()
        .map(|t| normalize(t.as_ref(), resources, config))
        .collect()
}
