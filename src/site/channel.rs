//! Live channel extractor (`/channels/<slug>`).

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use super::entry::{entry_description, entry_id, entry_title, non_empty_str, RinseSite};
use super::record::MediaInfo;
use super::{slug_from, SiteExtractor};
use crate::error::{ExtractError, Result};

static CHANNEL_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(?:www\.)?rinse\.fm/channels/(?P<slug>[^/#?]+)").expect("valid regex")
});

pub struct ChannelExtractor {
    site: Arc<RinseSite>,
}

impl ChannelExtractor {
    pub fn new(site: Arc<RinseSite>) -> Self {
        Self { site }
    }
}

impl SiteExtractor for ChannelExtractor {
    fn name(&self) -> &'static str {
        "channel"
    }

    fn matches(&self, url: &str) -> bool {
        CHANNEL_URL.is_match(url)
    }

    fn slug(&self, url: &str) -> Option<String> {
        slug_from(&CHANNEL_URL, url)
    }

    fn extract(&self, url: &str) -> Result<MediaInfo> {
        let slug = self.slug(url).ok_or_else(|| ExtractError::UnsupportedUrl {
            url: url.to_string(),
        })?;
        let entry = self.site.fetch_entry(url, &slug)?;

        let stream_url =
            non_empty_str(&entry, "streamerMountPoint").ok_or_else(|| ExtractError::MissingField {
                id: slug.clone(),
                field: "streamerMountPoint",
            })?;
        let formats = self.site.resolve_formats(stream_url, &slug)?;
        info!(%slug, stream = %stream_url, "Extracted live channel");

        Ok(MediaInfo {
            id: entry_id(&entry, &slug),
            title: entry_title(&entry, &slug),
            description: entry_description(&entry),
            display_id: slug,
            formats,
            is_live: true,
            release_timestamp: None,
            duration: None,
            genre: None,
        })
    }
}
