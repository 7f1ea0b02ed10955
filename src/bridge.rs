//! Bridge from a chunked transport to a stream of decoded payloads.
//!
//! [`SseBridge`] drives a [`ByteSource`] through a streaming UTF-8 decoder
//! and an [`EventDemuxer`], yielding each frame's payload as `Bytes`.
//!
//! The bridge only reads from the transport when its consumer polls it and
//! every payload from earlier reads has been handed out, so at most one
//! transport read is ever outstanding and nothing is read ahead of demand.
//! The transport is released exactly once, on whichever exit comes first:
//! completion sentinel, end of body, transport or frame error, `cancel`, or
//! drop.

use bytes::Bytes;
use futures::stream::FusedStream;
use futures::{Stream, StreamExt};
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::StreamError;
use crate::sse::{DemuxEvent, EventDemuxer, Utf8StreamDecoder};
use crate::traits::ByteSource;

/// Lifecycle of a bridge's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    /// Still reading from the transport
    Streaming,
    /// Closed normally: sentinel received or body ended
    Completed,
    /// Closed with a terminal error
    Failed,
    /// Abandoned by the consumer
    Cancelled,
}

impl BridgeState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BridgeState::Streaming)
    }
}

/// Pull-based stream of payload chunks decoded from an SSE body.
///
/// Yields `Ok(payload)` for every data frame, then ends with `None` on
/// completion, or with a single `Err` followed by `None` on failure.
#[derive(Debug)]
pub struct SseBridge<S: ByteSource> {
    source: Option<S>,
    decoder: Utf8StreamDecoder,
    demuxer: EventDemuxer,
    /// Payloads (and at most one trailing error) decoded but not yet pulled
    queue: VecDeque<Result<Bytes, StreamError>>,
    state: BridgeState,
    chunks_read: usize,
    payloads: usize,
}

impl<S: ByteSource> SseBridge<S> {
    /// Bridge a source using the default `[DONE]` sentinel.
    pub fn new(source: S) -> Self {
        Self::with_demuxer(source, EventDemuxer::new())
    }

    /// Bridge a source through a preconfigured demuxer.
    pub fn with_demuxer(source: S, demuxer: EventDemuxer) -> Self {
        Self {
            source: Some(source),
            decoder: Utf8StreamDecoder::new(),
            demuxer,
            queue: VecDeque::new(),
            state: BridgeState::Streaming,
            chunks_read: 0,
            payloads: 0,
        }
    }

    /// An output that fails immediately, for errors raised before a body
    /// existed (such as a non-success status).
    pub fn failed(err: StreamError) -> Self {
        tracing::warn!(error = %err, code = err.error_code(), "SSE stream failed before body");
        Self {
            source: None,
            decoder: Utf8StreamDecoder::new(),
            demuxer: EventDemuxer::new(),
            queue: VecDeque::from([Err(err)]),
            state: BridgeState::Failed,
            chunks_read: 0,
            payloads: 0,
        }
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// Stop reading, discard undelivered payloads and release the transport.
    ///
    /// Subsequent polls return `None`. Has no effect on an output that
    /// already ended, other than dropping what was still queued.
    pub fn cancel(&mut self) {
        self.queue.clear();
        if !self.state.is_terminal() {
            self.finish(BridgeState::Cancelled);
        }
    }

    /// Run the bridge on a tokio task, forwarding into a bounded channel.
    ///
    /// The task waits for channel capacity before each read. Dropping the
    /// receiver cancels the bridge, even while a transport read is pending.
    /// The handle resolves to the final state.
    pub fn spawn_channel(
        self,
        capacity: usize,
    ) -> (
        mpsc::Receiver<Result<Bytes, StreamError>>,
        JoinHandle<BridgeState>,
    )
    where
        S: 'static,
    {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(forward(self, tx));
        (rx, handle)
    }

    fn release(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.release();
            tracing::debug!(chunks = self.chunks_read, "Released SSE transport");
        }
    }

    fn finish(&mut self, state: BridgeState) {
        self.state = state;
        self.release();
        tracing::debug!(
            ?state,
            chunks = self.chunks_read,
            payloads = self.payloads,
            "SSE bridge closed"
        );
    }

    fn fail(&mut self, err: StreamError) {
        tracing::warn!(error = %err, code = err.error_code(), "SSE stream failed");
        self.queue.push_back(Err(err));
        self.finish(BridgeState::Failed);
    }

    fn relay(&mut self, text: &str) {
        for event in self.demuxer.feed(text) {
            match event {
                DemuxEvent::Data(frame) => {
                    self.payloads += 1;
                    self.queue.push_back(Ok(Bytes::from(frame.data)));
                }
                DemuxEvent::Done => self.finish(BridgeState::Completed),
                DemuxEvent::Error(err) => self.fail(err.into()),
            }
        }
    }

    fn end_of_data(&mut self) {
        let tail = self.decoder.finish();
        if !tail.is_empty() {
            self.relay(&tail);
        }

        if self.state == BridgeState::Streaming {
            if self.demuxer.has_partial_frame() {
                tracing::debug!(
                    buffered = self.demuxer.buffered_len(),
                    "Discarding unterminated SSE frame at end of body"
                );
            }
            tracing::debug!("SSE body ended without completion sentinel");
            self.finish(BridgeState::Completed);
        }
    }
}

impl<S: ByteSource> Stream for SseBridge<S> {
    type Item = Result<Bytes, StreamError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if let Some(item) = this.queue.pop_front() {
                return Poll::Ready(Some(item));
            }

            if this.state.is_terminal() {
                return Poll::Ready(None);
            }

            let Some(source) = this.source.as_mut() else {
                this.finish(BridgeState::Completed);
                continue;
            };

            match source.poll_read(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Ok(Some(chunk))) => {
                    this.chunks_read += 1;
                    let text = this.decoder.decode(&chunk);
                    this.relay(&text);
                }
                Poll::Ready(Ok(None)) => this.end_of_data(),
                Poll::Ready(Err(err)) => this.fail(StreamError::Transport(err)),
            }
        }
    }
}

impl<S: ByteSource> FusedStream for SseBridge<S> {
    fn is_terminated(&self) -> bool {
        self.state.is_terminal() && self.queue.is_empty()
    }
}

impl<S: ByteSource> Drop for SseBridge<S> {
    fn drop(&mut self) {
        if self.source.is_some() {
            tracing::debug!("SSE output dropped before end of stream");
            self.state = BridgeState::Cancelled;
            self.release();
        }
    }
}

async fn forward<S: ByteSource>(
    mut bridge: SseBridge<S>,
    tx: mpsc::Sender<Result<Bytes, StreamError>>,
) -> BridgeState {
    loop {
        let Ok(permit) = tx.reserve().await else {
            bridge.cancel();
            break;
        };

        let item = tokio::select! {
            item = bridge.next() => item,
            _ = tx.closed() => {
                bridge.cancel();
                break;
            }
        };

        match item {
            Some(item) => permit.send(item),
            None => break,
        }
    }

    bridge.state()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockByteSource, MockRead};
    use crate::sse::FrameDecodeError;
    use crate::traits::HttpError;

    async fn drain<S: ByteSource>(bridge: &mut SseBridge<S>) -> Vec<Result<Bytes, StreamError>> {
        let mut items = Vec::new();
        while let Some(item) = bridge.next().await {
            items.push(item);
        }
        items
    }

    fn ok(payload: &str) -> Result<Bytes, StreamError> {
        Ok(Bytes::from(payload.to_string()))
    }

    #[tokio::test]
    async fn test_payload_split_across_chunks() {
        let source = MockByteSource::chunks(["data: hel", "lo\n\n"]);
        let probe = source.probe();
        let mut bridge = SseBridge::new(source);

        assert_eq!(drain(&mut bridge).await, vec![ok("hello")]);
        assert_eq!(bridge.state(), BridgeState::Completed);
        assert_eq!(probe.release_count(), 1);
    }

    #[tokio::test]
    async fn test_done_closes_without_data() {
        let source = MockByteSource::chunks(["data: [DONE]\n\n"]);
        let probe = source.probe();
        let mut bridge = SseBridge::new(source);

        assert!(drain(&mut bridge).await.is_empty());
        assert_eq!(bridge.state(), BridgeState::Completed);
        assert_eq!(probe.release_count(), 1);
        // The end-of-data read after the sentinel is never issued.
        assert_eq!(probe.reads_started(), 1);
    }

    #[tokio::test]
    async fn test_nothing_after_done_is_delivered() {
        let source = MockByteSource::chunks(["data: a\n\ndata: [DONE]\n\ndata: b\n\n", "data: c\n\n"]);
        let probe = source.probe();
        let mut bridge = SseBridge::new(source);

        assert_eq!(drain(&mut bridge).await, vec![ok("a")]);
        assert_eq!(probe.reads_started(), 1);
        assert_eq!(probe.reads_after_release(), 0);
    }

    #[tokio::test]
    async fn test_chunk_then_transport_failure() {
        let source = MockByteSource::new(vec![
            MockRead::Chunk(Bytes::from("data: a\n\ndata: partial")),
            MockRead::Error(HttpError::Io("connection reset".to_string())),
        ]);
        let probe = source.probe();
        let mut bridge = SseBridge::new(source);

        let items = drain(&mut bridge).await;
        assert_eq!(
            items,
            vec![
                ok("a"),
                Err(StreamError::Transport(HttpError::Io(
                    "connection reset".to_string()
                ))),
            ]
        );
        assert_eq!(bridge.state(), BridgeState::Failed);
        assert_eq!(probe.release_count(), 1);

        // Terminal: nothing more, and no further reads.
        assert!(bridge.next().await.is_none());
        assert_eq!(probe.reads_after_release(), 0);
    }

    #[tokio::test]
    async fn test_end_of_body_is_implicit_completion() {
        let source = MockByteSource::chunks(["data: a\n\n", "data: unterminated"]);
        let probe = source.probe();
        let mut bridge = SseBridge::new(source);

        assert_eq!(drain(&mut bridge).await, vec![ok("a")]);
        assert_eq!(bridge.state(), BridgeState::Completed);
        assert_eq!(probe.release_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_body_closes_cleanly() {
        let source = MockByteSource::chunks(Vec::<&'static str>::new());
        let probe = source.probe();
        let mut bridge = SseBridge::new(source);

        assert!(drain(&mut bridge).await.is_empty());
        assert_eq!(bridge.state(), BridgeState::Completed);
        assert_eq!(probe.release_count(), 1);
    }

    #[tokio::test]
    async fn test_frame_decode_error_is_terminal() {
        let source = MockByteSource::chunks(["data: a\n\nretry: later\ndata: b\n\n", "data: c\n\n"]);
        let probe = source.probe();
        let mut bridge = SseBridge::new(source);

        let items = drain(&mut bridge).await;
        assert_eq!(
            items,
            vec![
                ok("a"),
                Err(StreamError::FrameDecode(FrameDecodeError::InvalidRetry {
                    value: "later".to_string()
                })),
            ]
        );
        assert_eq!(probe.reads_started(), 1);
        assert_eq!(probe.release_count(), 1);
    }

    #[tokio::test]
    async fn test_multibyte_split_between_chunks() {
        let body = "data: héllo 🎉\n\n".as_bytes();
        // Split inside the four-byte emoji.
        let split = body.len() - 4;
        let source = MockByteSource::chunks([body[..split].to_vec(), body[split..].to_vec()]);
        let mut bridge = SseBridge::new(source);

        assert_eq!(drain(&mut bridge).await, vec![ok("héllo 🎉")]);
    }

    #[tokio::test]
    async fn test_pending_reads_resume() {
        let source = MockByteSource::new(vec![
            MockRead::Pending,
            MockRead::Chunk(Bytes::from("data: x\n\n")),
            MockRead::Pending,
            MockRead::Chunk(Bytes::from("data: [DONE]\n\n")),
        ]);
        let probe = source.probe();
        let mut bridge = SseBridge::new(source);

        assert_eq!(drain(&mut bridge).await, vec![ok("x")]);
        assert_eq!(probe.max_outstanding(), 1);
        assert_eq!(probe.reads_started(), 2);
    }

    #[tokio::test]
    async fn test_no_read_ahead_of_demand() {
        let source = MockByteSource::chunks(["data: 1\n\n", "data: 2\n\n", "data: 3\n\n", "data: 4\n\n"]);
        let probe = source.probe();
        let mut bridge = SseBridge::new(source);

        assert_eq!(bridge.next().await, Some(ok("1")));
        assert_eq!(probe.reads_started(), 1);
        assert_eq!(bridge.next().await, Some(ok("2")));
        assert_eq!(probe.reads_started(), 2);
        assert_eq!(probe.max_outstanding(), 1);
    }

    #[tokio::test]
    async fn test_queued_payloads_served_before_next_read() {
        let source = MockByteSource::chunks(["data: 1\n\ndata: 2\n\ndata: 3\n\n", "data: 4\n\n"]);
        let probe = source.probe();
        let mut bridge = SseBridge::new(source);

        for expected in ["1", "2", "3"] {
            assert_eq!(bridge.next().await, Some(ok(expected)));
        }
        assert_eq!(probe.reads_started(), 1);
    }

    #[tokio::test]
    async fn test_cancel_releases_and_stops() {
        let source = MockByteSource::chunks(["data: 1\n\ndata: 2\n\n", "data: 3\n\n"]);
        let probe = source.probe();
        let mut bridge = SseBridge::new(source);

        assert_eq!(bridge.next().await, Some(ok("1")));
        bridge.cancel();
        bridge.cancel();

        assert_eq!(bridge.state(), BridgeState::Cancelled);
        assert!(bridge.next().await.is_none());
        assert!(bridge.is_terminated());
        assert_eq!(probe.release_count(), 1);
        assert_eq!(probe.reads_started(), 1);
    }

    #[tokio::test]
    async fn test_drop_releases_once() {
        let source = MockByteSource::chunks(["data: 1\n\n", "data: 2\n\n"]);
        let probe = source.probe();
        let mut bridge = SseBridge::new(source);

        assert_eq!(bridge.next().await, Some(ok("1")));
        drop(bridge);
        assert_eq!(probe.release_count(), 1);
    }

    #[tokio::test]
    async fn test_drop_after_completion_does_not_release_again() {
        let source = MockByteSource::chunks(["data: [DONE]\n\n"]);
        let probe = source.probe();
        let mut bridge = SseBridge::new(source);

        drain(&mut bridge).await;
        drop(bridge);
        assert_eq!(probe.release_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_output() {
        let err = StreamError::Transport(HttpError::ServerError {
            status: 401,
            message: "bad key".to_string(),
        });
        let mut bridge: SseBridge<MockByteSource> = SseBridge::failed(err.clone());

        assert_eq!(bridge.state(), BridgeState::Failed);
        assert_eq!(drain(&mut bridge).await, vec![Err(err)]);
    }

    #[tokio::test]
    async fn test_custom_sentinel() {
        let source = MockByteSource::chunks(["data: [DONE]\n\ndata: <end>\n\ndata: x\n\n"]);
        let mut bridge = SseBridge::with_demuxer(source, EventDemuxer::with_sentinel("<end>"));

        assert_eq!(drain(&mut bridge).await, vec![ok("[DONE]")]);
    }

    #[tokio::test]
    async fn test_spawn_channel_forwards_everything() {
        let source = MockByteSource::chunks(["data: a\n\ndata: b\n\n", "data: [DONE]\n\n"]);
        let probe = source.probe();
        let (mut rx, handle) = SseBridge::new(source).spawn_channel(1);

        let mut items = Vec::new();
        while let Some(item) = rx.recv().await {
            items.push(item);
        }

        assert_eq!(items, vec![ok("a"), ok("b")]);
        assert_eq!(handle.await.unwrap(), BridgeState::Completed);
        assert_eq!(probe.release_count(), 1);
    }

    #[tokio::test]
    async fn test_spawn_channel_receiver_drop_cancels_stalled_read() {
        let source = MockByteSource::new(vec![
            MockRead::Chunk(Bytes::from("data: a\n\n")),
            MockRead::Stall,
        ]);
        let probe = source.probe();
        let (mut rx, handle) = SseBridge::new(source).spawn_channel(4);

        assert_eq!(rx.recv().await, Some(ok("a")));
        drop(rx);

        assert_eq!(handle.await.unwrap(), BridgeState::Cancelled);
        assert_eq!(probe.release_count(), 1);
        assert_eq!(probe.reads_after_release(), 0);
    }
}
