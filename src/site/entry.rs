//! Entry retrieval and field normalization shared by both extractors.
//!
//! Rinse FM pages are Next.js pages; the channel or episode being shown lives
//! at `props.pageProps.entry` of the `__NEXT_DATA__` payload. Nothing about its
//! shape is guaranteed beyond the presence checks made here.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use super::formats::FormatResolver;
use super::record::Format;
use crate::config::Config;
use crate::error::{ExtractError, Result};
use crate::http_client::Fetch;
use crate::nextdata::{PayloadExtractor, DEFAULT_CHUNK_SIZE};
use crate::util::{clean_html, parse_iso8601};

const ENTRY_POINTER: &str = "/props/pageProps/entry";

/// Shared fetch/probe context for the Rinse FM extractors.
pub struct RinseSite {
    fetcher: Arc<dyn Fetch>,
    resolver: FormatResolver,
    chunk_size: usize,
}

impl RinseSite {
    pub fn new(fetcher: Arc<dyn Fetch>, config: &Config) -> Self {
        let resolver = FormatResolver::new(Arc::clone(&fetcher), config.probe.dead_links);
        Self {
            fetcher,
            resolver,
            chunk_size: config.scanner.chunk_size,
        }
    }

    /// Site with default settings on top of `fetcher`.
    pub fn with_fetcher(fetcher: Arc<dyn Fetch>) -> Self {
        let resolver = FormatResolver::new(Arc::clone(&fetcher), Default::default());
        Self {
            fetcher,
            resolver,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Fetch `url` and return its page entry object.
    #[instrument(skip(self))]
    pub fn fetch_entry(&self, url: &str, slug: &str) -> Result<Value> {
        let page = self.fetcher.fetch(url, slug)?;

        let mut extractor = PayloadExtractor::new().with_chunk_size(self.chunk_size);
        let found = extractor.parse(page).map_err(|source| ExtractError::Scan {
            id: slug.to_string(),
            source,
        })?;
        if !found {
            return Err(ExtractError::MissingPayload {
                id: slug.to_string(),
            });
        }

        let data = extractor.data().unwrap_or_default();
        debug!(bytes = data.len(), "Payload extracted");
        let mut root: Value = serde_json::from_str(&data).map_err(|source| ExtractError::Json {
            id: slug.to_string(),
            source,
        })?;

        root.pointer_mut(ENTRY_POINTER)
            .map(Value::take)
            .filter(|entry| !entry.is_null())
            .ok_or_else(|| ExtractError::MissingField {
                id: slug.to_string(),
                field: "props.pageProps.entry",
            })
    }

    pub fn resolve_formats(&self, url: &str, slug: &str) -> Result<Vec<Format>> {
        self.resolver.resolve(url, slug)
    }
}

/// Non-empty string value of `key`.
pub(crate) fn non_empty_str<'a>(entry: &'a Value, key: &str) -> Option<&'a str> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Entry id; numeric ids are stringified, anything missing falls back to the slug.
pub(crate) fn entry_id(entry: &Value, slug: &str) -> String {
    match entry.get("id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => slug.to_string(),
    }
}

pub(crate) fn entry_title(entry: &Value, slug: &str) -> String {
    non_empty_str(entry, "title").unwrap_or(slug).to_string()
}

pub(crate) fn entry_description(entry: &Value) -> Option<String> {
    clean_html(entry.get("description").and_then(Value::as_str)).filter(|d| !d.is_empty())
}

/// Join the date part of `date` with the time part of `time`.
///
/// The site stores the calendar date in `episodeDate` (with a dummy time)
/// and the time of day in `episodeTime` (stamped with the current date).
pub(crate) fn splice_date_time(date: &str, time: Option<&str>) -> String {
    let Some(time) = time else {
        return date.to_string();
    };
    let day = date.split_once('T').map_or(date, |(day, _)| day);
    let clock = time.split_once('T').map_or(time, |(_, clock)| clock);
    format!("{day}T{clock}")
}

/// Broadcast time from `episodeDate` and `episodeTime`.
pub(crate) fn release_timestamp(entry: &Value) -> Option<i64> {
    let date = non_empty_str(entry, "episodeDate")?;
    let spliced = splice_date_time(date, non_empty_str(entry, "episodeTime"));
    let timestamp = parse_iso8601(&spliced);
    if timestamp.is_none() {
        debug!(value = %spliced, "Unparseable release date");
    }
    timestamp
}

/// `episodeLength` is in minutes.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn duration_seconds(entry: &Value) -> Option<u64> {
    let minutes = entry.get("episodeLength")?;
    if let Some(whole) = minutes.as_u64() {
        return Some(whole.saturating_mul(60)).filter(|&secs| secs > 0);
    }
    let fractional = minutes.as_f64().filter(|m| m.is_finite() && *m > 0.0)?;
    Some((fractional * 60.0).round() as u64).filter(|&secs| secs > 0)
}

/// Titles of the tagged genres, comma separated.
pub(crate) fn genre(entry: &Value) -> Option<String> {
    let titles: Vec<&str> = entry
        .get("genreTag")?
        .as_array()?
        .iter()
        .filter_map(|tag| tag.get("title").and_then(Value::as_str))
        .collect();
    (!titles.is_empty()).then(|| titles.join(", "))
}
