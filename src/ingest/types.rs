// src/ingest/types.rs
use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;

use crate::error::TransportError;
use crate::extract::{clean_fragment, html_to_text, ExtractOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Html,
    PlainText,
}

impl DocumentKind {
    /// `.html` / `.htm` → Html; anything else → None (caller sniffs).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "html" | "htm" | "xhtml" => Some(Self::Html),
            "txt" | "text" => Some(Self::PlainText),
            _ => None,
        }
    }

    pub fn from_content_type(ct: &str) -> Option<Self> {
        let ct = ct.to_ascii_lowercase();
        if ct.contains("html") {
            Some(Self::Html)
        } else if ct.starts_with("text/") {
            Some(Self::PlainText)
        } else {
            None
        }
    }

    /// Looks like a full markup document (doctype or `<html`) near the start.
    pub fn sniff(body: &str) -> Self {
        let head: String = body
            .trim_start()
            .chars()
            .take(256)
            .collect::<String>()
            .to_ascii_lowercase();
        if head.starts_with("<!doctype html") || head.contains("<html") {
            Self::Html
        } else {
            Self::PlainText
        }
    }
}

/// Raw document as retrieved: consumed once by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub locator: String,
    pub body: String,
    pub kind: DocumentKind,
}

impl RawDocument {
    pub fn new(locator: impl Into<String>, body: impl Into<String>, kind: DocumentKind) -> Self {
        Self {
            locator: locator.into(),
            body: body.into(),
            kind,
        }
    }

    /// Flat visible text: full HTML extraction or plain-text cleanup.
    pub fn extract(&self, opts: &ExtractOptions) -> String {
        match self.kind {
            DocumentKind::Html => html_to_text(&self.body, opts),
            DocumentKind::PlainText => clean_fragment(&self.body, opts),
        }
    }
}

/// Document Retrieval Adapter: locator in, raw document or transport failure out.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, locator: &str) -> Result<RawDocument, TransportError>;
    fn name(&self) -> &'static str;
}
