//! In-memory [`Fetch`] for extractor tests.

use std::collections::HashMap;
use std::io::{self, Cursor};
use std::sync::Mutex;

use http::HeaderMap;

use crate::error::{ExtractError, Result};
use crate::http_client::{Fetch, Page};

struct Canned {
    final_url: String,
    headers: HeaderMap,
    body: Vec<u8>,
}

/// Serves canned responses; unknown URLs fail like a refused connection.
#[derive(Default)]
pub(crate) struct FakeFetch {
    pages: HashMap<String, Canned>,
    requested: Mutex<Vec<String>>,
}

impl FakeFetch {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_page(self, url: &str, headers: HeaderMap, body: &str) -> Self {
        self.with_redirect(url, url, headers, body)
    }

    pub(crate) fn with_redirect(
        mut self,
        url: &str,
        final_url: &str,
        headers: HeaderMap,
        body: &str,
    ) -> Self {
        self.pages.insert(
            url.to_string(),
            Canned {
                final_url: final_url.to_string(),
                headers,
                body: body.as_bytes().to_vec(),
            },
        );
        self
    }

    pub(crate) fn requested(&self) -> Vec<String> {
        self.requested.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Fetch for FakeFetch {
    fn fetch(&self, url: &str, id: &str) -> Result<Page> {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(url.to_string());
        }
        let canned = self.pages.get(url).ok_or_else(|| ExtractError::Transport {
            id: id.to_string(),
            url: url.to_string(),
            source: Box::new(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            )),
        })?;
        Ok(Page::new(
            canned.final_url.clone(),
            canned.headers.clone(),
            Box::new(Cursor::new(canned.body.clone())),
        ))
    }
}

/// A Next.js page embedding `entry` at `props.pageProps.entry`.
pub(crate) fn next_page(entry: &serde_json::Value) -> String {
    let data = serde_json::json!({
        "props": {"pageProps": {"entry": entry}, "__N_SSP": true},
        "page": "/episodes/[slug]",
        "buildId": "abc123",
    });
    format!(
        r#"<!DOCTYPE html><html><head><title>Rinse FM</title><script id="__NEXT_DATA__" type="application/json">{data}</script></head><body><div id="__next"></div></body></html>"#
    )
}
