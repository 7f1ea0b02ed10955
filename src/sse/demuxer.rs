//! Incremental SSE demuxer
//!
//! Consumes text fragments in the order they arrive and emits every frame
//! completed by each fragment. Fragments may split the input anywhere:
//! mid-line, mid-field or between the two line breaks of a terminator.
//! Whatever is left after the last complete frame is carried to the next
//! call.

use crate::sse::events::{DemuxEvent, FrameDecodeError, SseFrame, SseLine, DONE_SENTINEL};
use crate::traits::DemuxHandler;

/// Parse a single SSE line (without its line break) into its component type.
///
/// Exactly one space after the field colon is stripped; any further
/// whitespace belongs to the value.
pub fn parse_sse_line(line: &str) -> SseLine<'_> {
    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(rest) = line.strip_prefix(':') {
        return SseLine::Comment(rest);
    }

    if let Some(rest) = line.strip_prefix("data:") {
        return SseLine::Data(field_value(rest));
    }

    if let Some(rest) = line.strip_prefix("event:") {
        return SseLine::Event(field_value(rest));
    }

    if let Some(rest) = line.strip_prefix("id:") {
        return SseLine::Id(field_value(rest));
    }

    if let Some(rest) = line.strip_prefix("retry:") {
        return SseLine::Retry(field_value(rest));
    }

    SseLine::Ignored(line)
}

fn field_value(rest: &str) -> &str {
    rest.strip_prefix(' ').unwrap_or(rest)
}

/// Lifecycle of a demuxer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemuxState {
    /// Accepting input
    #[default]
    Open,
    /// The completion sentinel was seen
    Completed,
    /// A frame failed to decode
    Failed,
}

/// Fields of the frame currently being assembled.
#[derive(Debug, Default)]
struct PendingFrame {
    event: Option<String>,
    id: Option<String>,
    retry: Option<String>,
    /// `None` until the first `data:` line
    data: Option<String>,
}

impl PendingFrame {
    fn push_data(&mut self, value: &str) {
        match &mut self.data {
            Some(data) => {
                data.push('\n');
                data.push_str(value);
            }
            None => self.data = Some(value.to_string()),
        }
    }

    fn is_empty(&self) -> bool {
        self.event.is_none() && self.id.is_none() && self.retry.is_none() && self.data.is_none()
    }
}

/// Stateful SSE demuxer that accumulates fragments and emits complete frames.
///
/// Line breaks may be `\n` or `\r\n`, mixed freely. A frame whose payload
/// equals the sentinel produces [`DemuxEvent::Done`] instead of data, after
/// which the demuxer ignores all further input. A frame that fails to decode
/// produces [`DemuxEvent::Error`] and likewise ends the demuxer.
///
/// # Example
///
/// ```
/// use chatstream::sse::{DemuxEvent, EventDemuxer, SseFrame};
///
/// let mut demuxer = EventDemuxer::new();
/// assert!(demuxer.feed("data: hel").is_empty());
/// assert_eq!(
///     demuxer.feed("lo\n\n"),
///     vec![DemuxEvent::Data(SseFrame::data("hello"))]
/// );
/// assert_eq!(demuxer.feed("data: [DONE]\n\n"), vec![DemuxEvent::Done]);
/// ```
#[derive(Debug)]
pub struct EventDemuxer {
    /// Unterminated trailing line
    buffer: String,
    /// Frame assembled from lines already consumed
    frame: PendingFrame,
    sentinel: String,
    state: DemuxState,
}

impl Default for EventDemuxer {
    fn default() -> Self {
        Self::new()
    }
}

impl EventDemuxer {
    /// Create a demuxer using the `[DONE]` sentinel.
    pub fn new() -> Self {
        Self::with_sentinel(DONE_SENTINEL)
    }

    /// Create a demuxer with a custom completion sentinel (case-sensitive).
    pub fn with_sentinel(sentinel: impl Into<String>) -> Self {
        Self {
            buffer: String::new(),
            frame: PendingFrame::default(),
            sentinel: sentinel.into(),
            state: DemuxState::Open,
        }
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    pub fn state(&self) -> DemuxState {
        self.state
    }

    /// True once the sentinel was seen or a frame failed to decode.
    pub fn is_finished(&self) -> bool {
        self.state != DemuxState::Open
    }

    /// Bytes of unterminated input held for the next call.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether any input has been seen that did not yet form a frame.
    pub fn has_partial_frame(&self) -> bool {
        !self.buffer.is_empty() || !self.frame.is_empty()
    }

    /// Feed a text fragment, returning the events it completes in order.
    ///
    /// At most one terminal event is returned, always last.
    pub fn feed(&mut self, fragment: &str) -> Vec<DemuxEvent> {
        let mut events = Vec::new();

        if self.state != DemuxState::Open {
            if !fragment.is_empty() {
                tracing::trace!(
                    len = fragment.len(),
                    state = ?self.state,
                    "Ignoring SSE input after stream end"
                );
            }
            return events;
        }

        self.buffer.push_str(fragment);
        let buffer = std::mem::take(&mut self.buffer);
        let mut consumed = 0;

        while let Some(offset) = buffer[consumed..].find('\n') {
            let end = consumed + offset;
            let line = &buffer[consumed..end];
            let line = line.strip_suffix('\r').unwrap_or(line);
            consumed = end + 1;

            if let Some(event) = self.process_line(line) {
                let terminal = event.is_terminal();
                events.push(event);
                if terminal {
                    // Nothing after a terminal frame is ever processed.
                    self.frame = PendingFrame::default();
                    return events;
                }
            }
        }

        self.buffer = buffer;
        self.buffer.drain(..consumed);
        events
    }

    /// Feed a fragment and deliver its events through callbacks.
    pub fn feed_with<H: DemuxHandler + ?Sized>(&mut self, fragment: &str, handler: &mut H) {
        for event in self.feed(fragment) {
            match event {
                DemuxEvent::Data(frame) => handler.on_data(frame),
                DemuxEvent::Done => handler.on_complete(),
                DemuxEvent::Error(err) => handler.on_error(err),
            }
        }
    }

    /// Reset the demuxer state, including a terminal state.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.frame = PendingFrame::default();
        self.state = DemuxState::Open;
    }

    fn process_line(&mut self, line: &str) -> Option<DemuxEvent> {
        match parse_sse_line(line) {
            SseLine::Empty => self.dispatch_frame(),
            SseLine::Data(value) => {
                self.frame.push_data(value);
                None
            }
            SseLine::Event(value) => {
                self.frame.event = Some(value.to_string());
                None
            }
            SseLine::Id(value) => {
                self.frame.id = Some(value.to_string());
                None
            }
            SseLine::Retry(value) => {
                self.frame.retry = Some(value.to_string());
                None
            }
            SseLine::Comment(_) => None,
            SseLine::Ignored(line) => {
                tracing::trace!(line, "Ignoring unrecognized SSE line");
                None
            }
        }
    }

    fn dispatch_frame(&mut self) -> Option<DemuxEvent> {
        let frame = std::mem::take(&mut self.frame);

        // Frames without a payload line are dropped, whatever else they carry.
        let data = frame.data?;

        let retry = match frame.retry {
            Some(raw) => match parse_retry(&raw) {
                Some(retry) => Some(retry),
                None => {
                    tracing::warn!(value = %raw, "Rejecting SSE frame with invalid retry value");
                    self.state = DemuxState::Failed;
                    return Some(DemuxEvent::Error(FrameDecodeError::InvalidRetry {
                        value: raw,
                    }));
                }
            },
            None => None,
        };

        if data == self.sentinel {
            self.state = DemuxState::Completed;
            return Some(DemuxEvent::Done);
        }

        Some(DemuxEvent::Data(SseFrame {
            event: frame.event,
            id: frame.id,
            retry,
            data,
        }))
    }
}

/// ASCII digits only; `u64::from_str` would also accept a leading `+`.
fn parse_retry(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
