//! Extraction errors.
//!
//! Every variant that concerns a page or media resource carries the slug it
//! was extracted for. Two variants are *expected*: they happen during normal
//! operation (an episode without a replay, an expired replay link) and callers
//! should treat them as a skip rather than a failure.

use thiserror::Error;

use crate::nextdata::ScanError;

/// Boxed transport error, kept opaque so non-reqwest fetchers can report too.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while extracting a channel or episode.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The payload element broke its structural contract, or the page body
    /// could not be read.
    #[error("[{id}] {source}")]
    Scan {
        id: String,
        #[source]
        source: ScanError,
    },

    #[error("[{id}] missing or incomplete data")]
    MissingPayload { id: String },

    #[error("[{id}] failed to parse JSON payload: {source}")]
    Json {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    /// A field the site always provided is gone.
    #[error("[{id}] no {field}")]
    MissingField { id: String, field: &'static str },

    /// Not every episode has a replay.
    #[error("[{id}] no fileUrl")]
    NoMedia { id: String },

    /// Replay links expire; a failed probe usually means exactly that.
    #[error("[{id}] probably a dead link: {url}")]
    DeadLink {
        id: String,
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("[{id}] unable to fetch {url}: {source}")]
    Transport {
        id: String,
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("unsupported URL: {url}")]
    UnsupportedUrl { url: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl ExtractError {
    /// Returns `true` for failures that are part of normal operation.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::NoMedia { .. } | Self::DeadLink { .. })
    }

    /// Slug of the channel or episode the error belongs to, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Scan { id, .. }
            | Self::MissingPayload { id }
            | Self::Json { id, .. }
            | Self::MissingField { id, .. }
            | Self::NoMedia { id }
            | Self::DeadLink { id, .. }
            | Self::Transport { id, .. } => Some(id),
            Self::UnsupportedUrl { .. } | Self::Client(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn io_source() -> BoxError {
        Box::new(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ))
    }

    #[test]
    fn only_no_media_and_dead_link_are_expected() {
        assert!(ExtractError::NoMedia { id: "a".into() }.is_expected());
        assert!(ExtractError::DeadLink {
            id: "a".into(),
            url: "https://example.com/a.mp3".into(),
            source: io_source(),
        }
        .is_expected());

        assert!(!ExtractError::MissingPayload { id: "a".into() }.is_expected());
        assert!(!ExtractError::MissingField {
            id: "a".into(),
            field: "streamerMountPoint"
        }
        .is_expected());
        assert!(!ExtractError::Transport {
            id: "a".into(),
            url: "https://rinse.fm/episodes/a".into(),
            source: io_source(),
        }
        .is_expected());
        assert!(!ExtractError::Scan {
            id: "a".into(),
            source: ScanError::NestedTag { tag: "b".into() },
        }
        .is_expected());
    }

    #[test]
    fn messages_carry_the_slug() {
        let err = ExtractError::MissingField {
            id: "rinse-uk".into(),
            field: "streamerMountPoint",
        };
        assert_eq!(err.to_string(), "[rinse-uk] no streamerMountPoint");
        assert_eq!(err.id(), Some("rinse-uk"));

        let err = ExtractError::UnsupportedUrl {
            url: "https://example.com".into(),
        };
        assert_eq!(err.id(), None);
    }
}
