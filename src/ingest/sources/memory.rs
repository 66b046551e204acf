// src/ingest/sources/memory.rs
use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::TransportError;
use crate::ingest::types::{DocumentKind, DocumentSource, RawDocument};

/// In-memory fixtures keyed by locator. Unknown locators answer 404.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    docs: HashMap<String, (String, DocumentKind)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document; its kind is sniffed from the body.
    pub fn with(mut self, locator: &str, body: &str) -> Self {
        let kind = DocumentKind::sniff(body);
        self.docs
            .insert(locator.to_string(), (body.to_string(), kind));
        self
    }

    pub fn with_kind(mut self, locator: &str, body: &str, kind: DocumentKind) -> Self {
        self.docs
            .insert(locator.to_string(), (body.to_string(), kind));
        self
    }
}

#[async_trait]
impl DocumentSource for MemorySource {
    async fn fetch(&self, locator: &str) -> Result<RawDocument, TransportError> {
        match self.docs.get(locator) {
            Some((body, _)) if body.trim().is_empty() => Err(TransportError::Empty {
                locator: locator.to_string(),
            }),
            Some((body, kind)) => Ok(RawDocument::new(locator, body.clone(), *kind)),
            None => Err(TransportError::Status {
                locator: locator.to_string(),
                status: 404,
            }),
        }
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
