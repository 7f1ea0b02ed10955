//! Callback interface for SSE demuxing.
//!
//! [`EventDemuxer::feed`](crate::sse::EventDemuxer::feed) returns events as
//! values; this trait lets callers receive the same sequence through
//! callbacks via [`EventDemuxer::feed_with`](crate::sse::EventDemuxer::feed_with).

use crate::sse::{FrameDecodeError, SseFrame};

/// Receiver of demuxed SSE events.
///
/// Calls arrive synchronously, in frame order, before `feed_with` returns.
/// After `on_complete` or `on_error` the demuxer makes no further calls.
///
/// # Example
///
/// ```
/// use chatstream::sse::{EventDemuxer, FrameDecodeError, SseFrame};
/// use chatstream::traits::DemuxHandler;
///
/// #[derive(Default)]
/// struct Collect(String, bool);
///
/// impl DemuxHandler for Collect {
///     fn on_data(&mut self, frame: SseFrame) {
///         self.0.push_str(&frame.data);
///     }
///     fn on_complete(&mut self) {
///         self.1 = true;
///     }
///     fn on_error(&mut self, _err: FrameDecodeError) {}
/// }
///
/// let mut demuxer = EventDemuxer::new();
/// let mut sink = Collect::default();
/// demuxer.feed_with("data: a\n\ndata: b\n\ndata: [DONE]\n\n", &mut sink);
/// assert_eq!(sink.0, "ab");
/// assert!(sink.1);
/// ```
pub trait DemuxHandler {
    /// A frame with a non-sentinel payload.
    fn on_data(&mut self, frame: SseFrame);

    /// The completion sentinel was received.
    fn on_complete(&mut self);

    /// A frame failed to decode.
    fn on_error(&mut self, err: FrameDecodeError);
}
