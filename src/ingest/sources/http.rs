// src/ingest/sources/http.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use std::collections::BTreeSet;
use std::time::Duration;

use crate::config::FetchConfig;
use crate::error::TransportError;
use crate::ingest::types::{DocumentKind, DocumentSource, RawDocument};

/// Fetches web pages over HTTP(S). Any non-2xx status is a hard stop for that document.
///
/// Only hosts on the configured allowlist are requested; everything else is
/// rejected with 403 before a connection is made. Redirects are not followed,
/// so an allowed host cannot bounce the request elsewhere.
pub struct HttpSource {
    client: reqwest::Client,
    /// `None`: any host (operator-supplied locators only, e.g. the CLI).
    allowed_hosts: Option<BTreeSet<String>>,
}

impl HttpSource {
    pub fn new(cfg: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .user_agent(cfg.user_agent.clone())
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context("building http client")?;
        Ok(Self {
            client,
            allowed_hosts: Some(cfg.allowed_hosts.iter().cloned().collect()),
        })
    }

    /// Drop the host allowlist. For trusted callers that pick the URLs themselves.
    pub fn allow_any_host(mut self) -> Self {
        self.allowed_hosts = None;
        self
    }

    fn check(&self, locator: &str) -> Result<Url, TransportError> {
        let url = Url::parse(locator)
            .map_err(|e| TransportError::rejected(locator, 400, format!("invalid URL: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TransportError::rejected(
                locator,
                400,
                "only http and https URLs are fetched",
            ));
        }
        let host = url
            .host_str()
            .map(|h| h.trim_end_matches('.').to_ascii_lowercase())
            .ok_or_else(|| TransportError::rejected(locator, 400, "URL has no host"))?;
        if let Some(allowed) = &self.allowed_hosts {
            if !allowed.contains(&host) {
                return Err(TransportError::rejected(
                    locator,
                    403,
                    format!("host '{host}' is not on the fetch allowlist"),
                ));
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self, locator: &str) -> Result<RawDocument, TransportError> {
        let url = self.check(locator)?;
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| TransportError::Request {
                locator: locator.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                locator: locator.to_string(),
                status: status.as_u16(),
            });
        }

        let declared = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(DocumentKind::from_content_type);

        let body = resp.text().await.map_err(|source| TransportError::Request {
            locator: locator.to_string(),
            source,
        })?;
        if body.trim().is_empty() {
            return Err(TransportError::Empty {
                locator: locator.to_string(),
            });
        }

        let kind = declared.unwrap_or_else(|| DocumentKind::sniff(&body));
        Ok(RawDocument::new(locator, body, kind))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(hosts: &[&str]) -> HttpSource {
        let cfg = FetchConfig {
            allowed_hosts: hosts.iter().map(|h| h.to_string()).collect(),
            ..FetchConfig::default()
        };
        HttpSource::new(&cfg).unwrap()
    }

    #[tokio::test]
    async fn default_config_refuses_every_url() {
        let src = source(&[]);
        let err = src
            .fetch("http://169.254.169.254/latest/meta-data/")
            .await
            .unwrap_err();
        assert!(err.is_rejected());
        assert_eq!(err.status_code(), Some(403));
    }

    #[test]
    fn allowlist_is_exact_host_match() {
        let src = source(&["www.imdb.com"]);
        assert!(src.check("https://www.imdb.com/review/1").is_ok());
        assert!(src.check("https://WWW.IMDB.COM./review/1").is_ok());
        let err = src.check("https://www.imdb.com.evil.test/").unwrap_err();
        assert_eq!(err.status_code(), Some(403));
        let err = src.check("http://127.0.0.1:8080/").unwrap_err();
        assert_eq!(err.status_code(), Some(403));
    }

    #[test]
    fn non_http_locators_are_bad_requests() {
        let src = source(&["www.imdb.com"]).allow_any_host();
        assert_eq!(src.check("file:///etc/passwd").unwrap_err().status_code(), Some(400));
        assert_eq!(src.check("not a url").unwrap_err().status_code(), Some(400));
        assert!(src.check("http://10.0.0.1/").is_ok());
    }
}
