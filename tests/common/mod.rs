//! Common test utilities for integration tests.
//!
//! This module provides SSE body builders, chunking helpers and mock
//! configurations shared by the integration tests.
//!
//! # Example
//!
//! ```ignore
//! use common::{sse_body, split_every};
//!
//! let body = sse_body(&["hello", "world"]);
//! let chunks = split_every(&body, 3);
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use bytes::Bytes;
use chatstream::error::StreamError;
use futures::{Stream, StreamExt};

/// Builds an SSE body with one data frame per payload, terminated by `[DONE]`.
pub fn sse_body(payloads: &[&str]) -> String {
    let mut body = String::new();
    for payload in payloads {
        body.push_str("data: ");
        body.push_str(payload);
        body.push_str("\n\n");
    }
    body.push_str("data: [DONE]\n\n");
    body
}

/// Builds a typical completion delta payload.
pub fn delta_json(content: &str) -> String {
    serde_json::json!({
        "choices": [{"delta": {"content": content}, "index": 0}]
    })
    .to_string()
}

/// Splits a body into chunks of at most `size` bytes, ignoring char boundaries.
pub fn split_every(body: &str, size: usize) -> Vec<Bytes> {
    body.as_bytes()
        .chunks(size.max(1))
        .map(Bytes::copy_from_slice)
        .collect()
}

/// Drains a payload stream into its items.
pub async fn collect_items<S>(stream: S) -> Vec<Result<Bytes, StreamError>>
where
    S: Stream<Item = Result<Bytes, StreamError>>,
{
    stream.collect().await
}

/// Drains a payload stream, panicking on the first error.
pub async fn collect_payloads<S>(stream: S) -> Vec<String>
where
    S: Stream<Item = Result<Bytes, StreamError>>,
{
    collect_items(stream)
        .await
        .into_iter()
        .map(|item| {
            let bytes = item.expect("stream should not fail");
            String::from_utf8(bytes.to_vec()).expect("payload should be UTF-8")
        })
        .collect()
}
