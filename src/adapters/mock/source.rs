//! Scripted byte source for testing the bridge.
//!
//! Records how the bridge drives the transport: how many reads it started,
//! how many were outstanding at once, and how often it released the handle.

use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use crate::traits::{ByteSource, HttpError};

/// One scripted outcome of a read.
#[derive(Debug, Clone)]
pub enum MockRead {
    /// Deliver a chunk
    Chunk(Bytes),
    /// Fail the transport
    Error(HttpError),
    /// Stay pending for one poll, then continue with the script
    Pending,
    /// Stay pending forever
    Stall,
}

#[derive(Debug, Default)]
struct SourceStats {
    reads_started: AtomicUsize,
    reads_completed: AtomicUsize,
    outstanding: AtomicUsize,
    max_outstanding: AtomicUsize,
    releases: AtomicUsize,
    reads_after_release: AtomicUsize,
}

/// Shared view of a [`MockByteSource`]'s counters, usable after the source
/// has been moved into a bridge.
#[derive(Debug, Clone, Default)]
pub struct SourceProbe {
    stats: Arc<SourceStats>,
}

impl SourceProbe {
    /// Reads the bridge has started (a read starts on its first poll).
    pub fn reads_started(&self) -> usize {
        self.stats.reads_started.load(Ordering::SeqCst)
    }

    pub fn reads_completed(&self) -> usize {
        self.stats.reads_completed.load(Ordering::SeqCst)
    }

    /// Highest number of reads in flight at the same time.
    pub fn max_outstanding(&self) -> usize {
        self.stats.max_outstanding.load(Ordering::SeqCst)
    }

    pub fn release_count(&self) -> usize {
        self.stats.releases.load(Ordering::SeqCst)
    }

    /// Polls received after the handle was released.
    pub fn reads_after_release(&self) -> usize {
        self.stats.reads_after_release.load(Ordering::SeqCst)
    }
}

/// Byte source that plays back a script of reads.
///
/// When the script runs out the source reports end of data.
#[derive(Debug)]
pub struct MockByteSource {
    script: VecDeque<MockRead>,
    probe: SourceProbe,
    in_flight: bool,
    released: bool,
}

impl MockByteSource {
    pub fn new(script: impl IntoIterator<Item = MockRead>) -> Self {
        Self {
            script: script.into_iter().collect(),
            probe: SourceProbe::default(),
            in_flight: false,
            released: false,
        }
    }

    /// A source delivering the given chunks, then end of data.
    pub fn chunks<I, B>(chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        Self::new(chunks.into_iter().map(|chunk| MockRead::Chunk(chunk.into())))
    }

    pub fn probe(&self) -> SourceProbe {
        self.probe.clone()
    }

    fn complete_read(&mut self) {
        self.in_flight = false;
        let stats = &self.probe.stats;
        stats.outstanding.fetch_sub(1, Ordering::SeqCst);
        stats.reads_completed.fetch_add(1, Ordering::SeqCst);
    }
}

impl ByteSource for MockByteSource {
    fn poll_read(&mut self, cx: &mut Context<'_>) -> Poll<Result<Option<Bytes>, HttpError>> {
        if self.released {
            self.probe
                .stats
                .reads_after_release
                .fetch_add(1, Ordering::SeqCst);
            return Poll::Ready(Ok(None));
        }

        if !self.in_flight {
            self.in_flight = true;
            let stats = &self.probe.stats;
            stats.reads_started.fetch_add(1, Ordering::SeqCst);
            let outstanding = stats.outstanding.fetch_add(1, Ordering::SeqCst) + 1;
            stats.max_outstanding.fetch_max(outstanding, Ordering::SeqCst);
        }

        let outcome = match self.script.pop_front() {
            Some(MockRead::Pending) => {
                cx.waker().wake_by_ref();
                return Poll::Pending;
            }
            Some(MockRead::Stall) => {
                self.script.push_front(MockRead::Stall);
                return Poll::Pending;
            }
            Some(MockRead::Chunk(chunk)) => Ok(Some(chunk)),
            Some(MockRead::Error(err)) => Err(err),
            None => Ok(None),
        };

        self.complete_read();
        Poll::Ready(outcome)
    }

    fn release(&mut self) {
        self.released = true;
        self.probe.stats.releases.fetch_add(1, Ordering::SeqCst);
    }
}
