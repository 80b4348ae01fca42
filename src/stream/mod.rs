// src/stream/mod.rs
// =============================================================================
// Live-update channels for crawl progress.
//
// Submodules:
// - event: The ProgressEvent wire message
// - channel: In-process channel (e.g. feeding a web server's SSE endpoint)
// - sse: Writes server-sent-event frames to any io::Write
//
// How the events travel to a UI is up to the stream. The crawler only calls
// `send` and never lets a failed send stop the crawl.
// =============================================================================

mod channel;
mod event;
mod sse;

pub use channel::ChannelStream;
pub use event::{ProgressEvent, FINISHED_EVENT, PROGRESS_EVENT};
pub use sse::{sse_frame, SseWriter};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("stream is closed")]
    Closed,

    #[error("could not write event: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A live-update channel that accepts progress events
pub trait EventStream: Send {
    fn send(&mut self, event: &ProgressEvent) -> Result<(), StreamError>;
}
