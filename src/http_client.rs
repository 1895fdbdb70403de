//! Blocking HTTP transport.
//!
//! Extraction is a short linear sequence of fetches, so the transport is the
//! synchronous reqwest client. Response bodies are handed out unread as
//! [`std::io::Read`] streams: the payload scanner pulls only what it needs, and
//! the format probe drops media bodies after looking at the headers.

use std::fmt;
use std::io::{self, Read};
use std::time::Duration;

use http::HeaderMap;
use reqwest::blocking::{Client, Response};
use tracing::{debug, info, instrument};

use crate::config::HttpConfig;
use crate::error::{ExtractError, Result};

/// A fetched resource positioned at the start of its body.
pub struct Page {
    /// Final URL after redirects.
    pub url: String,
    pub headers: HeaderMap,
    body: Box<dyn Read + Send>,
}

impl Page {
    pub fn new(url: impl Into<String>, headers: HeaderMap, body: Box<dyn Read + Send>) -> Self {
        Self {
            url: url.into(),
            headers,
            body,
        }
    }
}

impl Read for Page {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.body.read(buf)
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("url", &self.url)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Fetches a URL on behalf of the entry identified by `id`.
///
/// Implementations report transport failures and non-success statuses as
/// [`ExtractError::Transport`].
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str, id: &str) -> Result<Page>;
}

/// reqwest-backed [`Fetch`] implementation.
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Client with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(&HttpConfig::default())
    }

    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .use_rustls_tls()
            // Compression (auto-negotiated via Accept-Encoding)
            .brotli(true)
            .zstd(true)
            .gzip(true)
            .deflate(true)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client })
    }
}

impl Fetch for HttpClient {
    #[instrument(skip(self), fields(url = %url, id = %id))]
    fn fetch(&self, url: &str, id: &str) -> Result<Page> {
        debug!("Fetching");
        let response = self
            .client
            .get(url)
            .send()
            .and_then(Response::error_for_status)
            .map_err(|source| ExtractError::Transport {
                id: id.to_string(),
                url: url.to_string(),
                source: Box::new(source),
            })?;

        info!(
            status = %response.status(),
            final_url = %response.url(),
            content_type = ?response.headers().get(http::header::CONTENT_TYPE),
            "Response received"
        );

        let final_url = response.url().to_string();
        let headers = response.headers().clone();
        Ok(Page::new(final_url, headers, Box::new(response)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_reads_through_to_body() {
        let mut page = Page::new(
            "https://rinse.fm/episodes/x",
            HeaderMap::new(),
            Box::new(io::Cursor::new(b"<html></html>".to_vec())),
        );
        let mut body = String::new();
        page.read_to_string(&mut body).unwrap();
        assert_eq!(body, "<html></html>");
        assert!(format!("{page:?}").contains("rinse.fm/episodes/x"));
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        let client = HttpClient::with_config(&HttpConfig {
            connect_timeout_secs: 2,
            timeout_secs: 2,
            ..HttpConfig::default()
        })
        .unwrap();
        let err = client.fetch("http://127.0.0.1:9/", "slug").unwrap_err();
        assert!(matches!(err, ExtractError::Transport { ref id, .. } if id == "slug"));
        assert!(!err.is_expected());
    }
}
