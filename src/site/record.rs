//! Normalized extraction output.

use serde::Serialize;

/// Codec hint attached to every format: the streams carry no video.
pub const AUDIO_ONLY: &str = "none";

/// A downloadable rendition of a channel stream or episode replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Format {
    /// Final media URL after redirects.
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,
    /// Size in bytes, when the server announced one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filesize: Option<u64>,
    pub vcodec: &'static str,
}

impl Format {
    pub fn audio(url: impl Into<String>, ext: Option<String>, filesize: Option<u64>) -> Self {
        Self {
            url: url.into(),
            ext,
            filesize,
            vcodec: AUDIO_ONLY,
        }
    }
}

/// Metadata record for one channel or episode.
///
/// Channels set `is_live`; episodes may carry release time, duration and
/// genre. Absent optional fields are left out of the serialized record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaInfo {
    pub id: String,
    /// URL slug of the channel or episode.
    pub display_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub formats: Vec<Format>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_live: bool,
    /// UNIX timestamp of the original broadcast.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_timestamp: Option<i64>,
    /// Duration in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}
