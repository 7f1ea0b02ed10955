//! Streaming-related error types.
//!
//! This module defines the terminal errors an output stream can end with.

use thiserror::Error;

use super::category::ErrorCategory;
use crate::sse::FrameDecodeError;
use crate::traits::HttpError;

/// Terminal error of a completion stream.
///
/// Chunks delivered before the error remain valid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// The transport failed, or the upstream answered with a non-success status.
    #[error("Transport error: {0}")]
    Transport(#[from] HttpError),

    /// A frame violated the event stream's structural rules.
    #[error("Frame decode error: {0}")]
    FrameDecode(#[from] FrameDecodeError),

    /// The outbound request could not be built.
    #[error("Failed to build request: {0}")]
    Request(String),
}

impl StreamError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            StreamError::Transport(HttpError::ServerError { status, .. }) => match *status {
                408 | 429 | 500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Client,
            },
            StreamError::Transport(HttpError::InvalidUrl(_)) => ErrorCategory::Configuration,
            StreamError::Transport(_) => ErrorCategory::Network,
            StreamError::FrameDecode(_) => ErrorCategory::Protocol,
            StreamError::Request(_) => ErrorCategory::Client,
        }
    }

    /// Whether a caller-level policy could reasonably retry the whole request.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::Transport(HttpError::ServerError { .. }) => "STREAM_HTTP_STATUS",
            StreamError::Transport(HttpError::Timeout(_)) => "STREAM_TIMEOUT",
            StreamError::Transport(_) => "STREAM_TRANSPORT",
            StreamError::FrameDecode(_) => "STREAM_FRAME_DECODE",
            StreamError::Request(_) => "STREAM_REQUEST",
        }
    }
}
