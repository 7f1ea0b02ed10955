//! SSE (Server-Sent Events) stream parsing
//!
//! SSE format consists of:
//! - `data: <payload>` - payload line, may repeat within a frame
//! - `event: <type>`, `id: <id>`, `retry: <ms>` - optional frame fields
//! - Empty line - signals end of frame
//! - Lines starting with `:` - comments (ignored)
//!
//! # Module structure
//! - `events` - Frame and event types (SseFrame, SseLine, DemuxEvent, FrameDecodeError)
//! - `demuxer` - Incremental parsing (EventDemuxer, parse_sse_line)
//! - `decoder` - Streaming UTF-8 decoding of raw body chunks

mod decoder;
mod demuxer;
mod events;

// Re-export public types
pub use decoder::Utf8StreamDecoder;
pub use demuxer::{parse_sse_line, DemuxState, EventDemuxer};
pub use events::{DemuxEvent, FrameDecodeError, SseFrame, SseLine, DONE_SENTINEL};
