//! Transport source abstraction.
//!
//! A [`ByteSource`] is the read side of an open response body. The bridge
//! polls it for one chunk at a time and releases it when the output ends.

use bytes::Bytes;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use super::http::HttpError;

/// Pull-based source of raw body bytes.
pub trait ByteSource: Send + Unpin {
    /// Poll for the next chunk.
    ///
    /// Returns:
    /// - `Ready(Ok(Some(chunk)))` - the next chunk of bytes
    /// - `Ready(Ok(None))` - end of data
    /// - `Ready(Err(error))` - the transport failed
    /// - `Pending` - no data yet; the waker is registered
    fn poll_read(&mut self, cx: &mut Context<'_>) -> Poll<Result<Option<Bytes>, HttpError>>;

    /// Release the underlying read handle.
    ///
    /// Calling this more than once must be a no-op. Reads after release
    /// report end of data.
    fn release(&mut self);

    /// Read the next chunk.
    fn read(&mut self) -> Read<'_, Self>
    where
        Self: Sized,
    {
        Read { source: self }
    }
}

/// Future returned by [`ByteSource::read`].
#[derive(Debug)]
pub struct Read<'a, S> {
    source: &'a mut S,
}

impl<S: ByteSource> Future for Read<'_, S> {
    type Output = Result<Option<Bytes>, HttpError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().source.poll_read(cx)
    }
}
