//! Error types for chatstream.
//!
//! - **Error Categories**: High-level classification for caller-side policies
//! - **Stream Errors**: Terminal errors of a completion stream
//! - **Config Errors**: Missing or invalid configuration
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection, timeout, dropped body | Yes |
//! | Server | 5xx, 408, 429 | Yes |
//! | Client | Other 4xx, unbuildable request | No |
//! | Protocol | Undecodable event stream | No |
//! | Configuration | Missing or invalid settings | No |
//!
//! Nothing in this crate retries; the flag is a hint for callers.

mod category;
mod config;
mod stream;

pub use category::ErrorCategory;
pub use config::ConfigError;
pub use stream::StreamError;

/// Type alias for stream results.
pub type StreamResult<T> = Result<T, StreamError>;
