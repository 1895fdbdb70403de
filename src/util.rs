//! Small text, date and media-type helpers shared by the extractors.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use http::HeaderMap;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use url::Url;

static NEWLINE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\n\s*").expect("valid regex"));
static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s?<\s?br\s?/?\s?>\s?").expect("valid regex"));
static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<\s?/\s?p\s?>\s?<\s?p[^>]*>").expect("valid regex"));
static DISPOSITION_FILENAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)filename\*?\s*=\s*(?:UTF-8'')?"?([^";]+)"?"#).expect("valid regex")
});

/// Strip markup from an HTML snippet, keeping paragraph and `<br>` breaks as
/// newlines and decoding character references.
///
/// `None` stays `None`.
pub fn clean_html(html: Option<&str>) -> Option<String> {
    let html = html?;
    // Source newlines are layout, not content
    let html = NEWLINE_RUN.replace_all(html, " ");
    let html = LINE_BREAK.replace_all(&html, "\n");
    let html = PARAGRAPH_BREAK.replace_all(&html, "\n");

    let fragment = Html::parse_fragment(&html);
    let text: String = fragment.root_element().text().collect();
    Some(text.trim().to_string())
}

/// Parse an ISO-8601 date or date-time into a UNIX timestamp.
///
/// Accepts `T` or a space as separator, optional fractional seconds and an
/// optional `Z`/offset; values without an offset are taken as UTC. A bare
/// date means midnight.
pub fn parse_iso8601(value: &str) -> Option<i64> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%d %H:%M:%S%.f%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.timestamp());
        }
    }

    let naive = value.strip_suffix('Z').unwrap_or(value);
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(dt.and_utc().timestamp());
        }
    }

    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}

/// Guess a file extension from the last path segment of `url`.
pub fn determine_ext(url: &str) -> Option<String> {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or(url).to_string(),
    };
    let (_, guess) = path.trim_end_matches('/').rsplit_once('.')?;
    ext_if_plausible(guess)
}

/// Detect a media extension from response headers.
///
/// `Content-Disposition` filenames win over the `Content-Type` mapping.
pub fn detect_ext(headers: &HeaderMap) -> Option<String> {
    let from_disposition = headers
        .get(CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| DISPOSITION_FILENAME.captures(value))
        .and_then(|caps| caps.get(1))
        .and_then(|name| name.as_str().trim().rsplit_once('.').map(|(_, ext)| ext.to_string()))
        .and_then(|ext| ext_if_plausible(&ext));

    from_disposition.or_else(|| {
        headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(mimetype_to_ext)
            .map(str::to_string)
    })
}

/// Map a MIME type (parameters allowed) to a container extension.
pub fn mimetype_to_ext(mimetype: &str) -> Option<&'static str> {
    let essence = mimetype.split(';').next().unwrap_or(mimetype).trim().to_ascii_lowercase();
    let ext = match essence.as_str() {
        "audio/mpeg" | "audio/mp3" | "audio/mpeg3" | "audio/x-mpeg" => "mp3",
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" => "m4a",
        "audio/aac" | "audio/aacp" | "audio/x-aac" => "aac",
        "audio/ogg" | "application/ogg" => "ogg",
        "audio/opus" => "opus",
        "audio/flac" | "audio/x-flac" => "flac",
        "audio/wav" | "audio/wave" | "audio/x-wav" => "wav",
        "audio/webm" => "webm",
        "application/vnd.apple.mpegurl" | "application/x-mpegurl" | "audio/mpegurl"
        | "audio/x-mpegurl" => "m3u8",
        "application/dash+xml" => "mpd",
        "video/mp4" => "mp4",
        _ => return None,
    };
    Some(ext)
}

/// Positive `Content-Length`, tolerating absent or malformed values.
pub fn parse_content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|&len| len > 0)
}

fn ext_if_plausible(guess: &str) -> Option<String> {
    (!guess.is_empty() && guess.len() <= 8 && guess.chars().all(|c| c.is_ascii_alphanumeric()))
        .then(|| guess.to_string())
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(http::header::HeaderName, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(name.clone(), HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn clean_html_strips_tags_and_entities() {
        assert_eq!(
            clean_html(Some("<p>Hello &amp; welcome</p><p>Line two</p>")).as_deref(),
            Some("Hello & welcome\nLine two")
        );
        assert_eq!(
            clean_html(Some("First<br/>Second\n   continued")).as_deref(),
            Some("First\nSecond continued")
        );
        assert_eq!(clean_html(Some("  plain  ")).as_deref(), Some("plain"));
        assert_eq!(clean_html(None), None);
    }

    #[test]
    fn parse_iso8601_variants() {
        assert_eq!(parse_iso8601("2023-05-01T15:30:00"), Some(1_682_955_000));
        assert_eq!(parse_iso8601("2023-05-01T15:30:00Z"), Some(1_682_955_000));
        assert_eq!(parse_iso8601("2023-05-01T15:30:00.000Z"), Some(1_682_955_000));
        assert_eq!(parse_iso8601("2023-05-01 15:30:00"), Some(1_682_955_000));
        assert_eq!(parse_iso8601("2023-05-01T16:30:00+01:00"), Some(1_682_955_000));
        assert_eq!(parse_iso8601("2023-05-01"), Some(1_682_899_200));
        assert_eq!(parse_iso8601("yesterday"), None);
        assert_eq!(parse_iso8601(""), None);
    }

    #[test]
    fn determine_ext_from_path() {
        assert_eq!(
            determine_ext("https://media.rinse.fm/replays/show-01.mp3?token=a.b").as_deref(),
            Some("mp3")
        );
        assert_eq!(determine_ext("https://example.com/live"), None);
        assert_eq!(determine_ext("https://example.com"), None);
        assert_eq!(determine_ext("/stream/audio.aac#t=1").as_deref(), Some("aac"));
        assert_eq!(determine_ext("https://example.com/a.b-c"), None);
    }

    #[test]
    fn detect_ext_prefers_disposition() {
        let map = headers(&[
            (CONTENT_DISPOSITION, "attachment; filename=\"show.m4a\""),
            (CONTENT_TYPE, "audio/mpeg"),
        ]);
        assert_eq!(detect_ext(&map).as_deref(), Some("m4a"));

        let map = headers(&[(CONTENT_TYPE, "audio/mpeg; charset=binary")]);
        assert_eq!(detect_ext(&map).as_deref(), Some("mp3"));

        let map = headers(&[(CONTENT_TYPE, "application/octet-stream")]);
        assert_eq!(detect_ext(&map), None);
        assert_eq!(detect_ext(&HeaderMap::new()), None);
    }

    #[test]
    fn content_length_parsing() {
        assert_eq!(
            parse_content_length(&headers(&[(CONTENT_LENGTH, "12345")])),
            Some(12345)
        );
        assert_eq!(parse_content_length(&headers(&[(CONTENT_LENGTH, "0")])), None);
        assert_eq!(parse_content_length(&headers(&[(CONTENT_LENGTH, "abc")])), None);
        assert_eq!(parse_content_length(&HeaderMap::new()), None);
    }
}
