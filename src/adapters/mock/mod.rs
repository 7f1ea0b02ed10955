//! Mock implementations for testing.
//!
//! Provides mock implementations of the transport traits, enabling tests
//! without network access.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable body streams
//! - [`MockByteSource`] - Scripted transport reads with a [`SourceProbe`]

pub mod http;
pub mod source;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use source::{MockByteSource, MockRead, SourceProbe};
