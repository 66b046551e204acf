// src/ingest/sources/file.rs
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

use crate::error::TransportError;
use crate::ingest::types::{DocumentKind, DocumentSource, RawDocument};

/// Reads documents from the local filesystem.
///
/// With a root directory, locators are relative paths below it and may not
/// escape it (`..` or absolute paths are rejected with status 400 before any I/O).
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    root: Option<PathBuf>,
}

impl FileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, locator: &str) -> Result<PathBuf, TransportError> {
        let rel = Path::new(locator);
        let Some(root) = &self.root else {
            return Ok(rel.to_path_buf());
        };
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(TransportError::rejected(
                locator,
                400,
                "path escapes the file root",
            ));
        }
        Ok(root.join(rel))
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    async fn fetch(&self, locator: &str) -> Result<RawDocument, TransportError> {
        let path = self.resolve(locator)?;
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| TransportError::Io {
                locator: locator.to_string(),
                source,
            })?;
        // Review dumps are not always valid UTF-8; keep going with replacement chars.
        let body = String::from_utf8_lossy(&bytes).into_owned();
        if body.trim().is_empty() {
            return Err(TransportError::Empty {
                locator: locator.to_string(),
            });
        }
        let kind = DocumentKind::from_path(&path).unwrap_or_else(|| DocumentKind::sniff(&body));
        Ok(RawDocument::new(locator, body, kind))
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
