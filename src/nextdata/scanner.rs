//! Incremental tag scanner.
//!
//! Decodes a byte stream as UTF-8 a bounded chunk at a time, feeds each chunk
//! to the html5ever tokenizer and forwards the resulting tag and text events
//! to a [`TagConsumer`]. Character references are not decoded inside script
//! data; the consumer sees the raw payload text.

use std::cell::RefCell;
use std::io::{self, ErrorKind, Read};
use std::ops::ControlFlow;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use tracing::trace;

use super::ScanError;

/// Characters decoded per tokenizer feed.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Event reported by [`TagScanner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagEvent {
    StartTag {
        name: String,
        attrs: Vec<(String, String)>,
    },
    EndTag {
        name: String,
    },
    Text(String),
}

impl TagEvent {
    /// Value of attribute `name` on a start tag.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            Self::StartTag { attrs, .. } => attrs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }
}

/// Receives scanner events and decides whether scanning continues.
pub trait TagConsumer {
    fn handle(&mut self, event: TagEvent) -> Result<ControlFlow<()>, ScanError>;
}

/// Why [`TagScanner::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEnd {
    /// The consumer broke out; the rest of the input was not read.
    Stopped,
    /// The input ran out.
    Exhausted,
}

/// Strict UTF-8 decoder yielding at most `chunk_size` characters per chunk.
///
/// Multi-byte sequences split across reads are carried over to the next chunk.
pub struct TextChunks<R> {
    reader: R,
    buf: Vec<u8>,
    pending: Vec<u8>,
}

impl<R: Read> TextChunks<R> {
    pub fn new(reader: R, chunk_size: usize) -> Result<Self, ScanError> {
        if chunk_size == 0 {
            return Err(ScanError::InvalidChunkSize);
        }
        Ok(Self {
            reader,
            buf: vec![0; chunk_size],
            pending: Vec::with_capacity(4),
        })
    }

    /// Next decoded chunk, or `None` at end of input.
    pub fn next_chunk(&mut self) -> io::Result<Option<String>> {
        loop {
            let n = match self.reader.read(&mut self.buf) {
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            if n == 0 {
                if self.pending.is_empty() {
                    return Ok(None);
                }
                return Err(io::Error::new(
                    ErrorKind::InvalidData,
                    "stream ended inside a UTF-8 sequence",
                ));
            }

            self.pending.extend_from_slice(&self.buf[..n]);
            let valid = match std::str::from_utf8(&self.pending) {
                Ok(_) => self.pending.len(),
                // Incomplete trailing sequence: keep it for the next read
                Err(e) if e.error_len().is_none() => e.valid_up_to(),
                Err(e) => return Err(io::Error::new(ErrorKind::InvalidData, e)),
            };
            if valid == 0 {
                continue;
            }

            let tail = self.pending.split_off(valid);
            let head = std::mem::replace(&mut self.pending, tail);
            let text =
                String::from_utf8(head).map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;
            return Ok(Some(text));
        }
    }
}

/// Token sink buffering events between tokenizer feeds.
#[derive(Default)]
struct EventQueue {
    events: RefCell<Vec<TagEvent>>,
}

impl EventQueue {
    fn push_text(&self, text: &str) {
        if !text.is_empty() {
            self.events.borrow_mut().push(TagEvent::Text(text.to_string()));
        }
    }

    fn take(&self) -> Vec<TagEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl TokenSink for EventQueue {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => {
                let name = tag.name.to_string();
                match tag.kind {
                    TagKind::StartTag => {
                        // Without a tree builder the tokenizer has to be told
                        // that script and style bodies are raw text.
                        let raw = match name.as_str() {
                            "script" => Some(RawKind::ScriptData),
                            "style" => Some(RawKind::Rawtext),
                            _ => None,
                        };
                        let attrs = tag
                            .attrs
                            .iter()
                            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                            .collect();
                        self.events
                            .borrow_mut()
                            .push(TagEvent::StartTag { name, attrs });
                        if let Some(kind) = raw {
                            return TokenSinkResult::RawData(kind);
                        }
                    }
                    TagKind::EndTag => {
                        self.events.borrow_mut().push(TagEvent::EndTag { name });
                    }
                }
            }
            Token::CharacterTokens(text) => self.push_text(&text),
            Token::NullCharacterToken => self.push_text("\0"),
            Token::ParseError(msg) => trace!(%msg, "tolerated markup error"),
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

/// Chunked html5ever tokenizer driving a [`TagConsumer`].
///
/// A scanner is bound to one input and consumed by [`TagScanner::run`].
pub struct TagScanner<R> {
    chunks: TextChunks<R>,
}

impl<R: Read> TagScanner<R> {
    /// Scanner reading [`DEFAULT_CHUNK_SIZE`] characters at a time.
    pub fn new(reader: R) -> Self {
        Self {
            chunks: TextChunks {
                reader,
                buf: vec![0; DEFAULT_CHUNK_SIZE],
                pending: Vec::with_capacity(4),
            },
        }
    }

    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Result<Self, ScanError> {
        Ok(Self {
            chunks: TextChunks::new(reader, chunk_size)?,
        })
    }

    /// Scan until the consumer breaks or the input is exhausted.
    ///
    /// Events tokenized from the same chunk after a break are discarded and
    /// no further input is read.
    pub fn run<C: TagConsumer>(mut self, consumer: &mut C) -> Result<ScanEnd, ScanError> {
        let tokenizer = Tokenizer::new(EventQueue::default(), TokenizerOpts::default());
        let input = BufferQueue::default();
        let mut fed = 0usize;

        while let Some(chunk) = self.chunks.next_chunk()? {
            fed += chunk.len();
            input.push_back(StrTendril::from(chunk));
            // The sink never suspends for scripts, so one feed drains the queue
            let _ = tokenizer.feed(&input);
            if Self::dispatch(&tokenizer.sink, consumer)?.is_break() {
                trace!(bytes = fed, "consumer stopped the scan");
                return Ok(ScanEnd::Stopped);
            }
        }

        tokenizer.end();
        if Self::dispatch(&tokenizer.sink, consumer)?.is_break() {
            return Ok(ScanEnd::Stopped);
        }
        trace!(bytes = fed, "input exhausted");
        Ok(ScanEnd::Exhausted)
    }

    fn dispatch<C: TagConsumer>(
        sink: &EventQueue,
        consumer: &mut C,
    ) -> Result<ControlFlow<()>, ScanError> {
        for event in sink.take() {
            if consumer.handle(event)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }
}
