// src/ingest/mod.rs
//! Document retrieval boundary and batch driver.
//!
//! Sources (HTTP, files, in-memory fixtures) hand over `RawDocument`s or a
//! `TransportError`. A failed fetch never aborts the batch: it is logged,
//! counted and reported back to the caller.

pub mod sources;
pub mod types;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use rayon::prelude::*;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

use crate::extract::ExtractOptions;
use crate::lexicon::LexicalResources;
use crate::pipeline::{normalize, NormalizedOutput, PipelineConfig};
use crate::ingest::types::{DocumentKind, DocumentSource, RawDocument};

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "normalize_documents_total",
            "Documents run through the normalization pipeline."
        );
        describe_counter!(
            "normalize_tokens_total",
            "Tokens emitted by the normalization pipeline."
        );
        describe_counter!(
            "ingest_fetch_errors_total",
            "Document fetches that failed at the transport boundary."
        );
        describe_histogram!(
            "normalize_batch_ms",
            "Extraction + normalization time per batch in milliseconds."
        );
    });
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessedDocument {
    pub locator: String,
    pub kind: DocumentKind,
    pub output: NormalizedOutput,
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchFailure {
    pub locator: String,
    pub status: Option<u16>,
    /// Refused locally (allowlist, file root) rather than failed upstream.
    pub rejected: bool,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub documents: Vec<ProcessedDocument>,
    pub failures: Vec<FetchFailure>,
}

/// List `.txt` / `.html` / `.htm` files directly under `dir`, sorted by path.
pub fn collect_locators(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && DocumentKind::from_path(&path).is_some() {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Fetch every locator in order. Failures are logged and collected, never raised.
pub async fn fetch_all(
    source: &dyn DocumentSource,
    locators: &[String],
) -> (Vec<RawDocument>, Vec<FetchFailure>) {
    ensure_metrics_described();

    let mut docs = Vec::with_capacity(locators.len());
    let mut failures = Vec::new();
    for loc in locators {
        match source.fetch(loc).await {
            Ok(doc) => docs.push(doc),
            Err(e) => {
                tracing::warn!(error = %e, source = source.name(), locator = %loc, "document fetch failed");
                counter!("ingest_fetch_errors_total").increment(1);
                failures.push(FetchFailure {
                    locator: loc.clone(),
                    status: e.status_code(),
                    rejected: e.is_rejected(),
                    message: e.to_string(),
                });
            }
        }
    }
    (docs, failures)
}

/// Extract + normalize already-fetched documents in parallel, preserving order.
pub fn normalize_documents(
    docs: &[RawDocument],
    resources: &LexicalResources,
    pipeline: &PipelineConfig,
    extract: &ExtractOptions,
) -> Vec<ProcessedDocument> {
    ensure_metrics_described();
    let t0 = std::time::Instant::now();

    let out: Vec<ProcessedDocument> = docs
        .par_iter()
        .map(|doc| ProcessedDocument {
            locator: doc.locator.clone(),
            kind: doc.kind,
            output: normalize(&doc.extract(extract), resources, pipeline),
        })
        .collect();

    let tokens: usize = out.iter().map(|d| token_count(&d.output)).sum();
    histogram!("normalize_batch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
    counter!("normalize_documents_total").increment(out.len() as u64);
    counter!("normalize_tokens_total").increment(tokens as u64);
    out
}

/// Fetch, extract and normalize a batch. Returns results in locator order.
pub async fn process_batch(
    source: &dyn DocumentSource,
    locators: &[String],
    resources: &LexicalResources,
    pipeline: &PipelineConfig,
    extract: &ExtractOptions,
) -> BatchReport {
    let (docs, failures) = fetch_all(source, locators).await;
    let documents = normalize_documents(&docs, resources, pipeline, extract);

    tracing::info!(
        source = source.name(),
        requested = locators.len(),
        processed = documents.len(),
        failed = failures.len(),
        "batch processed"
    );

    BatchReport {
        documents,
        failures,
    }
}

pub(crate) fn token_count(out: &NormalizedOutput) -> usize {
    match out {
        NormalizedOutput::Tokens(t) => t.len(),
        NormalizedOutput::Joined(s) => s.split(' ').filter(|t| !t.is_empty()).count(),
    }
}
