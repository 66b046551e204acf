//! Boundary error taxonomy.
//!
//! Only the edges of the system can fail: loading lexical resources and
//! retrieving documents. The normalization stages themselves are total.

use thiserror::Error;

/// A required lexical resource (stop words, lemma table) could not be loaded.
///
/// Fatal to pipeline initialization: surface it before processing any document.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("lexical resource unavailable for '{language}': {reason}")]
    Unavailable { language: String, reason: String },

    #[error("reading lexical resource {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ResourceError {
    pub(crate) fn unavailable(language: &str, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            language: language.to_string(),
            reason: reason.into(),
        }
    }
}

/// Document retrieval failed. Non-fatal to a batch: the caller decides
/// whether to skip, log, or abort.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{locator} returned status {status}")]
    Status { locator: String, status: u16 },

    #[error("request to {locator} failed: {source}")]
    Request {
        locator: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("reading {locator}: {source}")]
    Io {
        locator: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{locator} returned an empty document")]
    Empty { locator: String },

    /// Refused before any I/O: locator outside the allowlist or the file root.
    #[error("{locator} rejected: {reason}")]
    Rejected {
        locator: String,
        status: u16,
        reason: String,
    },
}

impl TransportError {
    /// HTTP-style status code for this failure, when one applies.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } | Self::Rejected { status, .. } => Some(*status),
            Self::Request { source, .. } => source.status().map(|s| s.as_u16()),
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => Some(404),
            _ => None,
        }
    }

    pub fn locator(&self) -> &str {
        match self {
            Self::Status { locator, .. }
            | Self::Request { locator, .. }
            | Self::Io { locator, .. }
            | Self::Empty { locator }
            | Self::Rejected { locator, .. } => locator,
        }
    }

    /// The request was refused by local policy, not failed upstream.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    pub(crate) fn rejected(locator: &str, status: u16, reason: impl Into<String>) -> Self {
        Self::Rejected {
            locator: locator.to_string(),
            status,
            reason: reason.into(),
        }
    }
}
