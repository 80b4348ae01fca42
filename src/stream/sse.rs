// src/stream/sse.rs
// =============================================================================
// Server-sent-event framing for progress events.
//
// A frame looks like this (note the blank line that ends it):
//   event: warmupProgress
//   data: {"completed":1,"total":2,"succeeded":1,"failed":0}
//
// =============================================================================

use std::io::Write;

use super::{EventStream, ProgressEvent, StreamError};

/// Formats one event as a complete SSE frame
pub fn sse_frame(event: &ProgressEvent) -> Result<String, serde_json::Error> {
    let data = serde_json::to_string(event)?;
    Ok(format!("event: {}\ndata: {}\n\n", event.name(), data))
}

// Writes SSE frames to a blocking writer such as stdout or a file
//
// Each frame is flushed right away so the consumer sees progress live. The
// write happens inside the pool's loop, so a slow writer holds up every
// in-flight request. Network consumers (a socket, an HTTP response body)
// should read from a ChannelStream instead and do their own writing.
#[derive(Debug)]
pub struct SseWriter<W> {
    writer: W,
}

impl<W: Write + Send> SseWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> EventStream for SseWriter<W> {
    fn send(&mut self, event: &ProgressEvent) -> Result<(), StreamError> {
        let frame = sse_frame(event)?;
        self.writer.write_all(frame.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}
