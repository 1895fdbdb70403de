//! Payload extraction state machine.

use std::io::Read;
use std::ops::ControlFlow;

use tracing::debug;

use super::scanner::{TagConsumer, TagEvent, TagScanner, DEFAULT_CHUNK_SIZE};
use super::ScanError;

/// Identifies the element carrying the embedded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadMarker {
    pub tag: &'static str,
    pub attribute: &'static str,
    pub value: &'static str,
}

/// `<script id="__NEXT_DATA__">`
pub const NEXT_DATA: PayloadMarker = PayloadMarker {
    tag: "script",
    attribute: "id",
    value: "__NEXT_DATA__",
};

impl PayloadMarker {
    fn matches(&self, name: &str, attrs: &[(String, String)]) -> bool {
        name == self.tag
            && attrs
                .iter()
                .any(|(key, value)| key == self.attribute && value == self.value)
    }
}

impl Default for PayloadMarker {
    fn default() -> Self {
        NEXT_DATA
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    NotStarted,
    Scanning,
    InsideTarget,
    Finished,
    Failed,
}

/// Next state after `event`.
///
/// The target element holds text only: a start tag or a foreign end tag
/// while inside it is a contract violation.
pub fn transition(
    state: ParseState,
    event: &TagEvent,
    marker: &PayloadMarker,
) -> Result<ParseState, ScanError> {
    use ParseState::{Failed, Finished, InsideTarget, NotStarted, Scanning};

    match (state, event) {
        (Finished | Failed, _) => Ok(state),
        (InsideTarget, TagEvent::StartTag { name, .. }) => {
            Err(ScanError::NestedTag { tag: name.clone() })
        }
        (InsideTarget, TagEvent::EndTag { name }) if name == marker.tag => Ok(Finished),
        (InsideTarget, TagEvent::EndTag { name }) => {
            Err(ScanError::MismatchedEndTag { tag: name.clone() })
        }
        (InsideTarget, TagEvent::Text(_)) => Ok(InsideTarget),
        (NotStarted | Scanning, TagEvent::StartTag { name, attrs }) if marker.matches(name, attrs) => {
            Ok(InsideTarget)
        }
        (NotStarted | Scanning, _) => Ok(Scanning),
    }
}

/// Collects the text of the first marked element of a page.
///
/// One extractor handles one input: [`parse`](Self::parse) may be called
/// once, after which [`data`](Self::data) returns the collected text.
#[derive(Debug)]
pub struct PayloadExtractor {
    marker: PayloadMarker,
    chunk_size: usize,
    state: ParseState,
    parts: Vec<String>,
}

impl PayloadExtractor {
    /// Extractor for the Next.js `__NEXT_DATA__` script.
    #[must_use]
    pub fn new() -> Self {
        Self::with_marker(NEXT_DATA)
    }

    #[must_use]
    pub fn with_marker(marker: PayloadMarker) -> Self {
        Self {
            marker,
            chunk_size: DEFAULT_CHUNK_SIZE,
            state: ParseState::NotStarted,
            parts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Scan `reader` until the marked element closes or input runs out.
    ///
    /// Returns `Ok(false)` when the element was not found, or was still open
    /// when the input ended. Structural violations and read failures are
    /// errors; the extractor is left in [`ParseState::Failed`] either way.
    pub fn parse<R: Read>(&mut self, reader: R) -> Result<bool, ScanError> {
        if self.state != ParseState::NotStarted {
            return Err(ScanError::AlreadyParsed);
        }
        self.state = ParseState::Scanning;

        let scan = TagScanner::with_chunk_size(reader, self.chunk_size)
            .and_then(|scanner| scanner.run(self));
        if let Err(e) = scan {
            self.state = ParseState::Failed;
            return Err(e);
        }

        if self.state != ParseState::Finished {
            debug!(state = ?self.state, "payload element not found");
            self.state = ParseState::Failed;
        }
        Ok(self.state == ParseState::Finished)
    }

    /// Concatenated payload text, once [`parse`](Self::parse) has completed.
    pub fn data(&self) -> Option<String> {
        matches!(self.state, ParseState::Finished | ParseState::Failed).then(|| self.parts.concat())
    }
}

impl Default for PayloadExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TagConsumer for PayloadExtractor {
    fn handle(&mut self, event: TagEvent) -> Result<ControlFlow<()>, ScanError> {
        let next = transition(self.state, &event, &self.marker)?;

        match (self.state, next) {
            (ParseState::InsideTarget, ParseState::InsideTarget) => {
                if let TagEvent::Text(text) = event {
                    self.parts.push(text);
                }
            }
            (_, ParseState::InsideTarget) => debug!(tag = self.marker.tag, "payload element opened"),
            (ParseState::InsideTarget, ParseState::Finished) => {
                debug!(fragments = self.parts.len(), "payload element closed");
            }
            _ => {}
        }

        self.state = next;
        Ok(if next == ParseState::Finished {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        })
    }
}
