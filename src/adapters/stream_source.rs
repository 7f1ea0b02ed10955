//! [`ByteSource`] over a boxed response body stream.

use bytes::Bytes;
use futures::Stream;
use futures_util::StreamExt;
use std::task::{Context, Poll};

use crate::traits::{ByteSource, ByteStream, HttpError};

/// Read handle over a [`ByteStream`], such as the one returned by
/// [`HttpClient::post_stream`](crate::traits::HttpClient::post_stream).
///
/// Releasing drops the stream, which closes the underlying connection.
pub struct StreamSource {
    inner: Option<ByteStream>,
}

impl StreamSource {
    pub fn new(stream: ByteStream) -> Self {
        Self {
            inner: Some(stream),
        }
    }

    /// Wrap any chunk stream.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, HttpError>> + Send + 'static,
    {
        Self::new(Box::pin(stream))
    }

    pub fn is_released(&self) -> bool {
        self.inner.is_none()
    }
}

impl std::fmt::Debug for StreamSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSource")
            .field("released", &self.is_released())
            .finish()
    }
}

impl ByteSource for StreamSource {
    fn poll_read(&mut self, cx: &mut Context<'_>) -> Poll<Result<Option<Bytes>, HttpError>> {
        let Some(stream) = self.inner.as_mut() else {
            return Poll::Ready(Ok(None));
        };

        match stream.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(chunk))) => Poll::Ready(Ok(Some(chunk))),
            Poll::Ready(Some(Err(err))) => Poll::Ready(Err(err)),
            Poll::Ready(None) => Poll::Ready(Ok(None)),
            Poll::Pending => Poll::Pending,
        }
    }

    fn release(&mut self) {
        if self.inner.take().is_some() {
            tracing::debug!("Released response body stream");
        }
    }
}
