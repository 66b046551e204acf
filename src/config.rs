// src/config.rs
//! Service configuration (TOML).
//!
//! Lookup order:
//! 1) $NORMALIZER_CONFIG_PATH (must exist)
//! 2) config/normalizer.toml
//! 3) built-in defaults
//!
//! ```toml
//! language = "english"
//! # resources_dir = "lexicon"   # required for lemma_pos = "noun" / "adj"
//!
//! [pipeline]
//! stem_mode = "lemmatize_only"   # or "lemmatize_then_stem"
//! output = "joined"              # or "tokens"
//! empty_tokens = "retain"        # or "drop"
//! lemma_pos = "verb"
//!
//! [extract]
//! separator = "\n"
//! trim = true
//!
//! [fetch]
//! timeout_secs = 15
//! user_agent = "doc-normalizer/0.1"
//! # Hosts `/fetch` may request over HTTP(S). Empty: every URL is refused.
//! allowed_hosts = ["www.imdb.com"]
//! # When set, `/fetch` reads files below this directory instead of URLs.
//! # file_root = "corpus"
//! ```

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::extract::ExtractOptions;
use crate::lexicon::PartOfSpeech;
use crate::pipeline::PipelineConfig;

pub const ENV_CONFIG_PATH: &str = "NORMALIZER_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/normalizer.toml";

fn default_language() -> String {
    "english".to_string()
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_user_agent() -> String {
    concat!("doc-normalizer/", env!("CARGO_PKG_VERSION")).to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Root directory for file locators; when set, `/fetch` reads files instead of URLs.
    #[serde(default)]
    pub file_root: Option<PathBuf>,
    /// Exact host names HTTP locators may point at. Empty refuses every URL.
    #[serde(default)]
    pub allowed_hosts: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            file_root: None,
            allowed_hosts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_language")]
    pub language: String,
    /// Directory with stop-word / lemma files. Built-in English when absent.
    #[serde(default)]
    pub resources_dir: Option<PathBuf>,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub extract: ExtractOptions,
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            resources_dir: None,
            pipeline: PipelineConfig::default(),
            extract: ExtractOptions::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: AppConfig = toml::from_str(s).context("parsing normalizer config")?;
        cfg.fetch.allowed_hosts = clean_hosts(std::mem::take(&mut cfg.fetch.allowed_hosts));
        if cfg.language.trim().is_empty() {
            return Err(anyhow!("config: language must not be empty"));
        }
        if cfg.resources_dir.is_none() && cfg.pipeline.lemma_pos != PartOfSpeech::Verb {
            return Err(anyhow!(
                "config: lemma_pos = {:?} needs a resources_dir with that lemma table; built-in resources are verb-only",
                cfg.pipeline.lemma_pos
            ));
        }
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Env var, then `config/normalizer.toml`, then defaults.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from(&default_p);
        }
        Ok(Self::default())
    }
}

/// Trimmed, lowercased, deduplicated, sorted; blanks dropped.
pub(crate) fn clean_hosts(items: Vec<String>) -> Vec<String> {
    use std::collections::BTreeSet;
    let mut set = BTreeSet::new();
    for it in items {
        let t = it.trim().trim_end_matches('.').to_ascii_lowercase();
        if !t.is_empty() {
            set.insert(t);
        }
    }
    set.into_iter().collect()
}
