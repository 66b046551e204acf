// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /normalize (defaults + per-request overrides)
// - POST /normalize/batch
// - POST /normalize/trace
// - POST /extract
// - POST /fetch (success + 502 on transport failure)
// - POST /fetch refusals (403 for hosts outside the allowlist, 400 for path escapes)

use std::sync::Arc;

use serde_json::json;
use serde_json::Value as Json;
use shuttle_axum::axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt as _; // for `oneshot`

use doc_normalizer::config::FetchConfig;
use doc_normalizer::ingest::sources::{FileSource, HttpSource, MemorySource};
use doc_normalizer::ingest::types::DocumentSource;
use doc_normalizer::{router, AppConfig, AppState, LexicalResources};

const BODY_LIMIT: usize = 1024 * 1024;

fn test_router() -> Router {
    let source = MemorySource::new()
        .with(
            "review/1",
            "<html><body><p>The dogs were running!</p><script>x()</script></body></html>",
        )
        .with("review/2", "Loved the ending<br />Watched it twice.");
    let state = AppState::new(
        LexicalResources::load("english").expect("english"),
        AppConfig::default(),
        Arc::new(source),
    );
    router(state)
}

fn router_with(source: Arc<dyn DocumentSource>) -> Router {
    let state = AppState::new(
        LexicalResources::load("english").expect("english"),
        AppConfig::default(),
        source,
    );
    router(state)
}

async fn post_json(app: Router, uri: &str, payload: Json) -> (StatusCode, Json) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    let v: Json = serde_json::from_slice(&bytes).expect("json body");
    (status, v)
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = test_router().oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    assert_eq!(String::from_utf8(bytes).expect("utf8").trim(), "OK");
}

#[tokio::test]
async fn api_normalize_defaults_to_joined() {
    let (status, v) = post_json(
        test_router(),
        "/normalize",
        json!({ "text": "Dogs are running in the park, and they ran fast!" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["output"], "dog run park run fast");
    assert_eq!(v["tokens_count"], 5);
}

#[tokio::test]
async fn api_normalize_honors_overrides() {
    let (status, v) = post_json(
        test_router(),
        "/normalize",
        json!({
            "text": "The dog was excited ... it's their favorite spot.",
            "stem_mode": "lemmatize_then_stem",
            "output": "tokens",
            "empty_tokens": "drop"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["output"], json!(["dog", "excit", "favorit", "spot"]));
    assert_eq!(v["tokens_count"], 4);
}

#[tokio::test]
async fn api_normalize_rejects_unknown_mode() {
    let req = Request::builder()
        .method("POST")
        .uri("/normalize")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "text": "x", "stem_mode": "porter" }).to_string(),
        ))
        .unwrap();
    let resp = test_router().oneshot(req).await.unwrap();
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn api_batch_keeps_order_and_ids() {
    let (status, v) = post_json(
        test_router(),
        "/normalize/batch",
        json!([
            { "id": "a", "text": "The children watched movies." },
            { "text": "" },
            { "id": "c", "text": "Dogs ran." }
        ]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let arr = v.as_array().expect("array");
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[0]["id"], "a");
    assert_eq!(arr[0]["output"], "children watch movies");
    assert_eq!(arr[1]["id"], Json::Null);
    assert_eq!(arr[1]["output"], "");
    assert_eq!(arr[2]["output"], "dog run");
}

#[tokio::test]
async fn api_trace_lists_every_stage() {
    let (status, v) = post_json(
        test_router(),
        "/normalize/trace",
        json!({ "text": "The Dogs ran!" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["folded"], "the dogs ran!");

    let stages: Vec<&str> = v["snapshots"]
        .as_array()
        .expect("snapshots")
        .iter()
        .map(|s| s["stage"].as_str().unwrap())
        .collect();
    assert_eq!(
        stages,
        ["tokenize", "stop_word_filter", "strip_punctuation", "lemmatize"]
    );
    assert_eq!(v["snapshots"][1]["tokens"], json!(["dogs", "ran!"]));
    assert_eq!(v["output"], "dog run");
}

#[tokio::test]
async fn api_extract_page_and_fragment() {
    let (status, v) = post_json(
        test_router(),
        "/extract",
        json!({ "html": "<h1>Title</h1><p>Body &amp; more</p>", "separator": " / " }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["text"], "Title / Body & more");

    let (_, v) = post_json(
        test_router(),
        "/extract",
        json!({ "html": "Great!<br /><br />Would watch again.", "plain": true }),
    )
    .await;
    assert_eq!(v["text"], "Great!\nWould watch again.");
}

#[tokio::test]
async fn api_fetch_normalizes_document() {
    let (status, v) = post_json(
        test_router(),
        "/fetch",
        json!({ "locator": "review/1" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["locator"], "review/1");
    assert_eq!(v["kind"], "html");
    assert_eq!(v["output"], "dog run");

    let (_, v) = post_json(
        test_router(),
        "/fetch",
        json!({ "locator": "review/2" }),
    )
    .await;
    assert_eq!(v["kind"], "plain_text");
    assert_eq!(v["output"], "love end watch twice");
}

#[tokio::test]
async fn api_fetch_failure_is_502() {
    let (status, v) = post_json(
        test_router(),
        "/fetch",
        json!({ "locator": "review/404" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(v["locator"], "review/404");
    assert_eq!(v["status"], 404);
    assert!(v["error"].as_str().unwrap().contains("review/404"));
}

#[tokio::test]
async fn api_fetch_refuses_hosts_outside_allowlist() {
    let http = HttpSource::new(&FetchConfig::default()).expect("client");
    let (status, v) = post_json(
        router_with(Arc::new(http)),
        "/fetch",
        json!({ "locator": "http://169.254.169.254/latest/meta-data/" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(v["status"], 403);

    let (status, _) = post_json(
        router_with(Arc::new(HttpSource::new(&FetchConfig::default()).unwrap())),
        "/fetch",
        json!({ "locator": "file:///etc/passwd" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn api_fetch_refuses_path_escapes() {
    let dir = tempfile::tempdir().unwrap();
    let (status, v) = post_json(
        router_with(Arc::new(FileSource::rooted(dir.path()))),
        "/fetch",
        json!({ "locator": "../etc/passwd" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(v["status"], 400);
}
