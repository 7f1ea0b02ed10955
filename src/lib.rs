//! chatstream - streaming chat completions over Server-Sent Events
//!
//! The core is a fragment-tolerant SSE demuxer ([`sse::EventDemuxer`]) and a
//! pull-based bridge ([`bridge::SseBridge`]) that turns a chunked HTTP body
//! into a stream of payload chunks with backpressure and guaranteed
//! transport release. [`client::CompletionClient`] wires both to a
//! completion endpoint.

pub mod adapters;
pub mod bridge;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod sse;
pub mod traits;

pub use bridge::{BridgeState, SseBridge};
pub use client::CompletionClient;
pub use config::ClientConfig;
pub use error::{ConfigError, StreamError};
