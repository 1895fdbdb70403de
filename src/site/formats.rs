//! Media URL probing.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::record::Format;
use crate::error::{ExtractError, Result};
use crate::http_client::Fetch;
use crate::util::{detect_ext, determine_ext, parse_content_length};

/// What to do when a media URL cannot be probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeadLinkPolicy {
    /// Report [`ExtractError::DeadLink`].
    #[default]
    Error,
    /// Keep the unprobed URL, guessing the extension from its path.
    Fallback,
}

/// Resolves a media URL into a [`Format`].
pub struct FormatResolver {
    fetcher: Arc<dyn Fetch>,
    policy: DeadLinkPolicy,
}

impl FormatResolver {
    pub fn new(fetcher: Arc<dyn Fetch>, policy: DeadLinkPolicy) -> Self {
        Self { fetcher, policy }
    }

    /// Probe `url` for its final location, extension and size.
    ///
    /// The media hosts reject HEAD, so this issues a GET and drops the
    /// response once the headers are in.
    #[instrument(skip(self))]
    pub fn resolve(&self, url: &str, id: &str) -> Result<Vec<Format>> {
        let page = match self.fetcher.fetch(url, id) {
            Ok(page) => page,
            Err(err @ ExtractError::Transport { .. }) => return self.unreachable(url, id, err),
            Err(err) => return Err(err),
        };

        let ext = detect_ext(&page.headers).or_else(|| determine_ext(&page.url));
        let filesize = parse_content_length(&page.headers);
        debug!(final_url = %page.url, ?ext, ?filesize, "Probed format");

        Ok(vec![Format::audio(page.url, ext, filesize)])
    }

    fn unreachable(&self, url: &str, id: &str, err: ExtractError) -> Result<Vec<Format>> {
        match self.policy {
            DeadLinkPolicy::Error => {
                warn!(%url, error = %err, "Media probe failed");
                Err(ExtractError::DeadLink {
                    id: id.to_string(),
                    url: url.to_string(),
                    source: Box::new(err),
                })
            }
            DeadLinkPolicy::Fallback => {
                debug!(%url, error = %err, "Media probe failed, keeping unprobed URL");
                Ok(vec![Format::audio(url, determine_ext(url), None)])
            }
        }
    }
}
