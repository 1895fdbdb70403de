//! Replay episode extractor (`/episodes/<slug>`).

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use super::entry::{
    duration_seconds, entry_description, entry_id, entry_title, genre, non_empty_str,
    release_timestamp, RinseSite,
};
use super::record::MediaInfo;
use super::{slug_from, SiteExtractor};
use crate::error::{ExtractError, Result};

static EPISODE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(?:www\.)?rinse\.fm/episodes/(?P<slug>[^/#?]+)").expect("valid regex")
});

pub struct EpisodeExtractor {
    site: Arc<RinseSite>,
}

impl EpisodeExtractor {
    pub fn new(site: Arc<RinseSite>) -> Self {
        Self { site }
    }
}

impl SiteExtractor for EpisodeExtractor {
    fn name(&self) -> &'static str {
        "episode"
    }

    fn matches(&self, url: &str) -> bool {
        EPISODE_URL.is_match(url)
    }

    fn slug(&self, url: &str) -> Option<String> {
        slug_from(&EPISODE_URL, url)
    }

    fn extract(&self, url: &str) -> Result<MediaInfo> {
        let slug = self.slug(url).ok_or_else(|| ExtractError::UnsupportedUrl {
            url: url.to_string(),
        })?;
        let entry = self.site.fetch_entry(url, &slug)?;

        // Not every episode has a replay
        let file_url = non_empty_str(&entry, "fileUrl")
            .ok_or_else(|| ExtractError::NoMedia { id: slug.clone() })?;
        let formats = self.site.resolve_formats(file_url, &slug)?;
        info!(%slug, file = %file_url, "Extracted episode");

        Ok(MediaInfo {
            id: entry_id(&entry, &slug),
            title: entry_title(&entry, &slug),
            description: entry_description(&entry),
            display_id: slug,
            formats,
            is_live: false,
            release_timestamp: release_timestamp(&entry),
            duration: duration_seconds(&entry),
            genre: genre(&entry),
        })
    }
}
