//! Mock implementations for test fixtures.
//!
//! This module re-exports the mock implementations from
//! `chatstream::adapters::mock` and provides test-specific configurations.

pub use chatstream::adapters::mock::{
    MockByteSource, MockHttpClient, MockRead, MockResponse, SourceProbe,
};
pub use chatstream::traits::{Headers, HttpClient, HttpError};

use bytes::Bytes;

/// Configuration for setting up mock HTTP responses.
pub struct MockHttpConfig {
    client: MockHttpClient,
}

impl MockHttpConfig {
    /// Creates a new mock HTTP configuration.
    pub fn new() -> Self {
        Self {
            client: MockHttpClient::new(),
        }
    }

    /// Configures a body delivered in the given chunks.
    pub fn with_chunks(self, url: &str, chunks: Vec<Bytes>) -> Self {
        self.client.set_response(url, MockResponse::Stream(chunks));
        self
    }

    /// Configures an SSE body delivered as a single chunk.
    pub fn with_sse_body(self, url: &str, body: &str) -> Self {
        self.with_chunks(url, vec![Bytes::from(body.to_string())])
    }

    /// Configures a non-success status.
    pub fn with_error_response(self, url: &str, status: u16, message: &str) -> Self {
        self.client.set_response(
            url,
            MockResponse::Error(HttpError::ServerError {
                status,
                message: message.to_string(),
            }),
        );
        self
    }

    /// Builds the configured MockHttpClient.
    pub fn build(self) -> MockHttpClient {
        self.client
    }
}

impl Default for MockHttpConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A scripted source with a chunk per element, plus its probe.
pub fn probed_source(chunks: Vec<Bytes>) -> (MockByteSource, SourceProbe) {
    let source = MockByteSource::chunks(chunks);
    let probe = source.probe();
    (source, probe)
}
