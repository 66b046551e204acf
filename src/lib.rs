// src/lib.rs
// Public library surface for the service binary, demos and integration tests.

pub mod config;
pub mod error;
pub mod extract;
pub mod lexicon;
pub mod pipeline;
pub mod tokenize;

// Boundary adapters (document retrieval) and the service surface
pub mod api;
pub mod debug;
pub mod ingest;
pub mod metrics;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::AppConfig;
pub use crate::error::{ResourceError, TransportError};
pub use crate::extract::{extract_text, parse_html, ExtractOptions, ParsedDocument};
pub use crate::lexicon::{LexicalResources, PartOfSpeech};
pub use crate::pipeline::{
    normalize, normalize_batch, normalize_trace, EmptyTokenPolicy, NormalizedOutput, OutputMode,
    PipelineConfig, Stage, StemMode,
};
pub use crate::tokenize::tokenize;

use anyhow::{bail, Context};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::ingest::sources::{FileSource, HttpSource};
use crate::ingest::types::DocumentSource;

/// Compact fmt logging filtered by RUST_LOG (falls back to `default_filter`).
/// Safe to call when a subscriber is already installed.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

/// Load lexical resources (fatal on failure) and pick the document source.
pub fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
    let resources =
        LexicalResources::load_configured(config.resources_dir.as_deref(), &config.language)
            .context("loading lexical resources")?;
    if !resources.lemmatizer().has_table(config.pipeline.lemma_pos) {
        bail!(
            "no {} lemma table for '{}'",
            config.pipeline.lemma_pos.file_stem(),
            resources.language()
        );
    }

    let source: Arc<dyn DocumentSource> = match &config.fetch.file_root {
        Some(root) => Arc::new(FileSource::rooted(root.clone())),
        None => Arc::new(HttpSource::new(&config.fetch)?),
    };
    info!(
        language = resources.language(),
        source = source.name(),
        allowed_hosts = config.fetch.allowed_hosts.len(),
        stem_mode = ?config.pipeline.stem_mode,
        "normalizer state ready"
    );
    Ok(AppState::new(resources, config, source))
}

/// Full API router from the default config lookup (env → config/normalizer.toml → defaults).
pub fn app() -> anyhow::Result<axum::Router> {
    let config = AppConfig::load_default()?;
    Ok(router(build_state(config)?))
}
