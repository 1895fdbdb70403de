//! Streaming extraction of the Next.js `__NEXT_DATA__` payload.
//!
//! Next.js pages ship their server-rendered state as JSON inside
//! `<script id="__NEXT_DATA__" type="application/json">`. That element sits in
//! the document head, so the page body never needs to be read.
//!
//! # Architecture
//!
//! - [`TagScanner`]: reads a byte stream in bounded chunks, tokenizes it with
//!   html5ever and reports [`TagEvent`]s to a [`TagConsumer`]
//! - [`PayloadExtractor`]: a [`TagConsumer`] state machine that collects the
//!   text of the marked element and breaks the scan once it closes
//!
//! # Example
//!
//! ```rust
//! use rinsefm::nextdata::extract_payload;
//!
//! let html = r#"<html><head><script id="__NEXT_DATA__">{"props":{}}</script>"#;
//! let payload = extract_payload(html.as_bytes(), 1000).unwrap();
//! assert_eq!(payload.as_deref(), Some(r#"{"props":{}}"#));
//! ```

pub mod extractor;
pub mod scanner;

use std::io::Read;

use thiserror::Error;

pub use extractor::{transition, ParseState, PayloadExtractor, PayloadMarker, NEXT_DATA};
pub use scanner::{ScanEnd, TagConsumer, TagEvent, TagScanner, TextChunks, DEFAULT_CHUNK_SIZE};

/// Scanner and payload state machine errors.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The payload element is defined to contain no child elements.
    #[error("unexpected nested tag <{tag}> inside payload element")]
    NestedTag { tag: String },

    #[error("unexpected closing tag </{tag}> inside payload element")]
    MismatchedEndTag { tag: String },

    #[error("payload extractor already consumed its input")]
    AlreadyParsed,

    #[error("chunk size must be at least one character")]
    InvalidChunkSize,

    #[error("failed to read page body: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    /// Returns `true` when the page violated the payload element contract.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::NestedTag { .. } | Self::MismatchedEndTag { .. })
    }
}

/// Run a fresh [`PayloadExtractor`] over `reader`.
///
/// Returns `Ok(None)` when the page has no complete `__NEXT_DATA__` element.
pub fn extract_payload<R: Read>(reader: R, chunk_size: usize) -> Result<Option<String>, ScanError> {
    let mut extractor = PayloadExtractor::new().with_chunk_size(chunk_size);
    if extractor.parse(reader)? {
        Ok(extractor.data())
    } else {
        Ok(None)
    }
}
