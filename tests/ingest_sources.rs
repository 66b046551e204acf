// tests/ingest_sources.rs
use async_trait::async_trait;
use doc_normalizer::ingest::sources::{FileSource, MemorySource};
use doc_normalizer::ingest::types::{DocumentKind, DocumentSource, RawDocument};
use doc_normalizer::ingest::{collect_locators, process_batch};
use doc_normalizer::{
    ExtractOptions, LexicalResources, OutputMode, PipelineConfig, TransportError,
};
use std::fs;

struct AlwaysDown;

#[async_trait]
impl DocumentSource for AlwaysDown {
    async fn fetch(&self, locator: &str) -> Result<RawDocument, TransportError> {
        Err(TransportError::Status {
            locator: locator.to_string(),
            status: 503,
        })
    }
    fn name(&self) -> &'static str {
        "always-down"
    }
}

fn english() -> LexicalResources {
    LexicalResources::load("english").unwrap()
}

#[tokio::test]
async fn file_source_reads_review_corpus() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("0_9.txt"),
        "Just loved it<br /><br />The dogs were running everywhere.",
    )
    .unwrap();
    fs::write(
        dir.path().join("1_2.html"),
        "<html><body><p>Boring.</p><p>I walked out</p></body></html>",
    )
    .unwrap();
    fs::write(dir.path().join("notes.md"), "ignored").unwrap();

    let files = collect_locators(dir.path()).unwrap();
    assert_eq!(files.len(), 2);
    let locators: Vec<String> = files.iter().map(|p| p.display().to_string()).collect();

    let cfg = PipelineConfig::default().with_output(OutputMode::Tokens);
    let report = process_batch(
        &FileSource::new(),
        &locators,
        &english(),
        &cfg,
        &ExtractOptions::default(),
    )
    .await;

    assert!(report.failures.is_empty());
    assert_eq!(report.documents[0].kind, DocumentKind::PlainText);
    assert_eq!(
        report.documents[0].output.as_tokens().unwrap(),
        ["love", "dog", "run", "everywhere"]
    );
    assert_eq!(report.documents[1].kind, DocumentKind::Html);
    assert_eq!(
        report.documents[1].output.as_tokens().unwrap(),
        ["bore", "walk"]
    );
}

#[tokio::test]
async fn rooted_file_source_rejects_escapes() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("ok.txt"), "fine").unwrap();
    let src = FileSource::rooted(dir.path());

    assert!(src.fetch("ok.txt").await.is_ok());

    let err = src.fetch("../etc/passwd").await.unwrap_err();
    assert_eq!(err.status_code(), Some(400));

    let missing = src.fetch("nope.txt").await.unwrap_err();
    assert_eq!(missing.status_code(), Some(404));
}

#[tokio::test]
async fn empty_documents_are_transport_failures() {
    let src = MemorySource::new().with("blank", "   \n");
    let err = src.fetch("blank").await.unwrap_err();
    assert!(matches!(err, TransportError::Empty { .. }));
}

#[tokio::test]
async fn transport_failures_are_reported_not_raised() {
    let locators = vec!["https://example.test/a".to_string()];
    let report = process_batch(
        &AlwaysDown,
        &locators,
        &english(),
        &PipelineConfig::default(),
        &ExtractOptions::default(),
    )
    .await;
    assert!(report.documents.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].status, Some(503));
}
