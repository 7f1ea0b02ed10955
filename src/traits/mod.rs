//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - Streaming HTTP POST
//! - [`ByteSource`] - Pull-based transport read handle
//! - [`DemuxHandler`] - Callback receiver for demuxed SSE events

pub mod http;
pub mod source;
pub mod sse;

pub use http::{ByteStream, Headers, HttpClient, HttpError};
pub use source::{ByteSource, Read};
pub use sse::DemuxHandler;
