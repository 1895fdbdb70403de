//! Rinse FM extractors.
//!
//! # Architecture
//!
//! - [`SiteExtractor`]: one extractor per URL shape (`channel`, `episode`)
//! - [`ExtractorRegistry`]: dispatches URLs to the matching extractor
//! - [`RinseSite`]: shared page fetching, payload extraction and probing
//! - [`MediaInfo`] / [`Format`]: the normalized output
//!
//! # Example
//!
//! ```rust,no_run
//! use rinsefm::{Config, ExtractorRegistry};
//!
//! # fn example() -> anyhow::Result<()> {
//! let registry = ExtractorRegistry::from_config(&Config::default())?;
//! let info = registry.extract("https://rinse.fm/channels/rinse-uk")?;
//! println!("{} -> {}", info.title, info.formats[0].url);
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod entry;
pub mod episode;
pub mod formats;
pub mod record;
#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use regex::Regex;
use tracing::debug;

pub use channel::ChannelExtractor;
pub use entry::RinseSite;
pub use episode::EpisodeExtractor;
pub use formats::{DeadLinkPolicy, FormatResolver};
pub use record::{Format, MediaInfo, AUDIO_ONLY};

use crate::config::Config;
use crate::error::{ExtractError, Result};
use crate::http_client::HttpClient;

/// Extractor for one kind of Rinse FM page.
pub trait SiteExtractor: Send + Sync {
    /// Registration tag (`"channel"`, `"episode"`).
    fn name(&self) -> &'static str;

    /// Check if this extractor handles the given URL.
    fn matches(&self, url: &str) -> bool;

    /// Channel or episode slug from `url`.
    fn slug(&self, url: &str) -> Option<String>;

    /// Extract a complete record; no partial records are returned.
    fn extract(&self, url: &str) -> Result<MediaInfo>;
}

fn slug_from(pattern: &Regex, url: &str) -> Option<String> {
    pattern
        .captures(url)
        .and_then(|caps| caps.name("slug"))
        .map(|slug| slug.as_str().to_string())
}

/// Routes URLs to the registered extractors.
///
/// Extractors are checked in registration order. First match wins.
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn SiteExtractor>>,
}

impl ExtractorRegistry {
    /// Registry with the `channel` and `episode` extractors sharing `site`.
    #[must_use]
    pub fn new(site: Arc<RinseSite>) -> Self {
        let extractors: Vec<Box<dyn SiteExtractor>> = vec![
            Box::new(ChannelExtractor::new(Arc::clone(&site))),
            Box::new(EpisodeExtractor::new(site)),
        ];
        Self { extractors }
    }

    /// Registry backed by a fresh [`HttpClient`].
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = HttpClient::with_config(&config.http)?;
        Ok(Self::new(Arc::new(RinseSite::new(Arc::new(client), config))))
    }

    pub fn extractors(&self) -> impl Iterator<Item = &dyn SiteExtractor> {
        self.extractors.iter().map(|extractor| &**extractor)
    }

    pub fn find(&self, url: &str) -> Option<&dyn SiteExtractor> {
        self.extractors().find(|extractor| extractor.matches(url))
    }

    pub fn extract(&self, url: &str) -> Result<MediaInfo> {
        let extractor = self.find(url).ok_or_else(|| ExtractError::UnsupportedUrl {
            url: url.to_string(),
        })?;
        debug!("Matched extractor: {}", extractor.name());
        extractor.extract(url)
    }
}
