//! HTTP surface over the pipeline.
//!
//! - `GET  /health`
//! - `POST /normalize`        `{ text, stem_mode?, output?, empty_tokens? }`
//! - `POST /normalize/batch`  `[{ id?, text }]`
//! - `POST /normalize/trace`  `{ text }`
//! - `POST /extract`          `{ html, separator?, trim?, plain? }`
//! - `POST /fetch`            `{ locator }` via the configured document source
//!
//! Everything CPU-bound (parsing, normalization) runs on the blocking pool.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::config::AppConfig;
use crate::debug::log_normalized;
use crate::extract::{clean_fragment, html_to_text, ExtractOptions};
use crate::ingest::types::DocumentSource;
use crate::ingest::{fetch_all, normalize_documents, token_count, ProcessedDocument};
use crate::lexicon::LexicalResources;
use crate::pipeline::{
    normalize, normalize_batch, normalize_trace, EmptyTokenPolicy, NormalizedOutput, OutputMode,
    PipelineConfig, StemMode, Trace,
};

#[derive(Clone)]
pub struct AppState {
    pub resources: Arc<LexicalResources>,
    pub config: Arc<AppConfig>,
    pub source: Arc<dyn DocumentSource>,
}

impl AppState {
    pub fn new(
        resources: LexicalResources,
        config: AppConfig,
        source: Arc<dyn DocumentSource>,
    ) -> Self {
        Self {
            resources: Arc::new(resources),
            config: Arc::new(config),
            source,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/normalize", post(normalize_one))
        .route("/normalize/batch", post(normalize_many))
        .route("/normalize/trace", post(trace_one))
        .route("/extract", post(extract))
        .route("/fetch", post(fetch_and_normalize))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, msg: impl ToString) -> ApiError {
    (status, Json(json!({ "error": msg.to_string() })))
}

/// Run CPU-bound work off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))
}

#[derive(Deserialize)]
struct NormalizeReq {
    text: String,
    #[serde(default)]
    stem_mode: Option<StemMode>,
    #[serde(default)]
    output: Option<OutputMode>,
    #[serde(default)]
    empty_tokens: Option<EmptyTokenPolicy>,
}

impl NormalizeReq {
    fn pipeline(&self, base: PipelineConfig) -> PipelineConfig {
        PipelineConfig {
            stem_mode: self.stem_mode.unwrap_or(base.stem_mode),
            output: self.output.unwrap_or(base.output),
            empty_tokens: self.empty_tokens.unwrap_or(base.empty_tokens),
            lemma_pos: base.lemma_pos,
        }
    }
}

#[derive(Serialize)]
struct NormalizeResp {
    output: NormalizedOutput,
    tokens_count: usize,
}

async fn normalize_one(
    State(state): State<AppState>,
    Json(body): Json<NormalizeReq>,
) -> Result<Json<NormalizeResp>, ApiError> {
    let cfg = body.pipeline(state.config.pipeline);
    let resources = state.resources.clone();
    let resp = blocking(move || {
        let output = normalize(&body.text, &resources, &cfg);
        let tokens_count = token_count(&output);
        log_normalized("normalize", &body.text, tokens_count);
        NormalizeResp {
            output,
            tokens_count,
        }
    })
    .await?;
    Ok(Json(resp))
}

#[derive(Deserialize)]
struct BatchItem {
    #[serde(default)]
    id: Option<String>,
    text: String,
}

#[derive(Serialize)]
struct BatchResult {
    id: Option<String>,
    output: NormalizedOutput,
}

async fn normalize_many(
    State(state): State<AppState>,
    Json(items): Json<Vec<BatchItem>>,
) -> Result<Json<Vec<BatchResult>>, ApiError> {
    let resources = state.resources.clone();
    let cfg = state.config.pipeline;
    let (ids, texts): (Vec<Option<String>>, Vec<String>) =
        items.into_iter().map(|it| (it.id, it.text)).unzip();

    let outputs = blocking(move || normalize_batch(&texts, &resources, &cfg)).await?;

    Ok(Json(
        ids.into_iter()
            .zip(outputs)
            .map(|(id, output)| BatchResult { id, output })
            .collect(),
    ))
}

#[derive(Deserialize)]
struct TraceReq {
    text: String,
    #[serde(default)]
    stem_mode: Option<StemMode>,
}

async fn trace_one(
    State(state): State<AppState>,
    Json(body): Json<TraceReq>,
) -> Result<Json<Trace>, ApiError> {
    let mut cfg = state.config.pipeline;
    if let Some(mode) = body.stem_mode {
        cfg.stem_mode = mode;
    }
    let resources = state.resources.clone();
    let trace = blocking(move || normalize_trace(&body.text, &resources, &cfg)).await?;
    Ok(Json(trace))
}

#[derive(Deserialize)]
struct ExtractReq {
    html: String,
    #[serde(default)]
    separator: Option<String>,
    #[serde(default)]
    trim: Option<bool>,
    /// Treat the input as plain text with stray markup instead of a full page.
    #[serde(default)]
    plain: bool,
}

#[derive(Serialize)]
struct ExtractResp {
    text: String,
}

async fn extract(
    State(state): State<AppState>,
    Json(body): Json<ExtractReq>,
) -> Result<Json<ExtractResp>, ApiError> {
    let base = &state.config.extract;
    let opts = ExtractOptions {
        separator: body.separator.unwrap_or_else(|| base.separator.clone()),
        trim: body.trim.unwrap_or(base.trim),
    };
    let text = blocking(move || {
        if body.plain {
            clean_fragment(&body.html, &opts)
        } else {
            html_to_text(&body.html, &opts)
        }
    })
    .await?;
    Ok(Json(ExtractResp { text }))
}

#[derive(Deserialize)]
struct FetchReq {
    locator: String,
}

async fn fetch_and_normalize(
    State(state): State<AppState>,
    Json(body): Json<FetchReq>,
) -> Result<Json<ProcessedDocument>, ApiError> {
    let (docs, mut failures) = fetch_all(state.source.as_ref(), &[body.locator]).await;
    if let Some(f) = failures.pop() {
        // Local refusals keep their own 4xx; anything upstream is a bad gateway.
        let status = f
            .status
            .filter(|_| f.rejected)
            .and_then(|s| StatusCode::from_u16(s).ok())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        return Err((
            status,
            Json(json!({
                "error": f.message,
                "locator": f.locator,
                "status": f.status,
            })),
        ));
    }

    let resources = state.resources.clone();
    let config = state.config.clone();
    let mut processed = blocking(move || {
        normalize_documents(&docs, &resources, &config.pipeline, &config.extract)
    })
    .await?;

    processed
        .pop()
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::INTERNAL_SERVER_ERROR, "no document processed"))
}
