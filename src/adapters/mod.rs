//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`StreamSource`] - Byte source over a response body stream
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Configurable HTTP responses
//! - [`mock::MockByteSource`] - Scripted transport reads

pub mod mock;
pub mod reqwest_http;
pub mod stream_source;

pub use mock::{MockByteSource, MockHttpClient};
pub use reqwest_http::ReqwestHttpClient;
pub use stream_source::StreamSource;
