//! Streaming completion client.
//!
//! Posts a chat completion request and hands the response body to an
//! [`SseBridge`], so callers only ever see payload chunks or one terminal
//! [`StreamError`].

use crate::adapters::{ReqwestHttpClient, StreamSource};
use crate::bridge::SseBridge;
use crate::config::ClientConfig;
use crate::error::StreamError;
use crate::models::{ChatMessage, CompletionRequest};
use crate::sse::EventDemuxer;
use crate::traits::{Headers, HttpClient};

/// Client for a streaming chat completion endpoint.
///
/// Generic over the [`HttpClient`] so tests can swap in a mock transport.
#[derive(Debug, Clone)]
pub struct CompletionClient<C: HttpClient = ReqwestHttpClient> {
    config: ClientConfig,
    http: C,
}

impl CompletionClient<ReqwestHttpClient> {
    /// Create a client backed by reqwest.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http_client(config, ReqwestHttpClient::new())
    }
}

impl<C: HttpClient> CompletionClient<C> {
    pub fn with_http_client(config: ClientConfig, http: C) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Headers sent with every completion request.
    pub fn request_headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());
        if let Some(key) = &self.config.api_key {
            headers.insert(self.config.api_key_header.clone(), key.clone());
        }
        headers
    }

    pub fn build_request(&self, messages: Vec<ChatMessage>) -> CompletionRequest {
        CompletionRequest::new(messages, self.config.options.clone())
    }

    /// Start a completion and return its payload stream.
    ///
    /// Failures before the body arrives (unreachable endpoint, non-success
    /// status) are delivered as the stream's only item.
    pub async fn stream(&self, messages: Vec<ChatMessage>) -> SseBridge<StreamSource> {
        let request = self.build_request(messages);
        let body = match serde_json::to_string(&request) {
            Ok(body) => body,
            Err(e) => return SseBridge::failed(StreamError::Request(e.to_string())),
        };

        tracing::debug!(
            endpoint = %self.config.endpoint,
            model = %request.options.model,
            messages = request.messages.len(),
            "Opening completion stream"
        );

        match self
            .http
            .post_stream(&self.config.endpoint, &body, &self.request_headers())
            .await
        {
            Ok(body) => SseBridge::with_demuxer(
                StreamSource::new(body),
                EventDemuxer::with_sentinel(self.config.done_sentinel.clone()),
            ),
            Err(err) => SseBridge::failed(StreamError::Transport(err)),
        }
    }

    /// Stream a completion for a single user prompt.
    pub async fn stream_prompt(&self, prompt: &str) -> SseBridge<StreamSource> {
        self.stream(vec![ChatMessage::user(prompt)]).await
    }
}
