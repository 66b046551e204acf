//! Normalizer service binary entrypoint.
//! Boots the Axum HTTP server: loads config and lexical resources once, then
//! serves the normalization API plus `/metrics`.

use anyhow::Context;
use doc_normalizer::{build_state, config::AppConfig, init_tracing, metrics::Metrics, router};
use shuttle_axum::ShuttleAxum;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing("doc_normalizer=info,normalizer=info,warn");

    let config = AppConfig::load_default().context("loading normalizer config")?;
    // Resources are loaded before serving anything: a missing stop-word or lemma
    // table stops startup here.
    let state = build_state(config)?;
    let metrics = Metrics::init()?;

    let app = router(state).merge(metrics.router());
    Ok(app.into())
}
