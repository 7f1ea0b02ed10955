//! SSE frame and event types
//!
//! Contains the decoded frame, the per-line classification used while
//! assembling frames, and the events a demuxer emits.

use thiserror::Error;

/// Payload that marks the end of a completion stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// A complete SSE frame: every field line up to a blank-line terminator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SseFrame {
    /// Event type (from `event:` field)
    pub event: Option<String>,
    /// Event ID (from `id:` field)
    pub id: Option<String>,
    /// Reconnection time in milliseconds (from `retry:` field)
    pub retry: Option<u64>,
    /// Payload (from `data:` field(s), joined with newlines)
    pub data: String,
}

impl SseFrame {
    /// Create a frame carrying only a payload.
    pub fn data(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }

    /// Set the event type.
    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Set the event ID.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the retry interval.
    pub fn with_retry(mut self, retry: u64) -> Self {
        self.retry = Some(retry);
        self
    }
}

/// Represents a parsed SSE line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SseLine<'a> {
    /// Payload line (e.g., "data: {\"text\": \"hello\"}")
    Data(&'a str),
    /// Event type declaration (e.g., "event: content")
    Event(&'a str),
    /// Event ID (e.g., "id: 42")
    Id(&'a str),
    /// Reconnection time, still unparsed (e.g., "retry: 3000")
    Retry(&'a str),
    /// Empty line - signals end of frame
    Empty,
    /// Comment line (starts with ':')
    Comment(&'a str),
    /// Unknown field or a line without a colon
    Ignored(&'a str),
}

/// Output of a single `feed` step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemuxEvent {
    /// A complete frame with a non-sentinel payload
    Data(SseFrame),
    /// The completion sentinel was received
    Done,
    /// A frame could not be decoded; the demuxer is now failed
    Error(FrameDecodeError),
}

impl DemuxEvent {
    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DemuxEvent::Done | DemuxEvent::Error(_))
    }
}

/// Errors raised while decoding a complete frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameDecodeError {
    /// `retry:` value is not a base-10 unsigned integer
    #[error("Invalid retry value in SSE frame: {value:?}")]
    InvalidRetry { value: String },
}
