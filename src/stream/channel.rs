// src/stream/channel.rs
// =============================================================================
// An EventStream backed by a tokio unbounded channel.
//
// The receiving half can live anywhere in the process, e.g. in a web handler
// that turns the events into an SSE response. Sending never blocks the
// crawl; once the receiver is dropped every send reports StreamError::Closed.
// =============================================================================

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::{EventStream, ProgressEvent, StreamError};

#[derive(Debug, Clone)]
pub struct ChannelStream {
    tx: UnboundedSender<ProgressEvent>,
}

impl ChannelStream {
    pub fn new() -> (Self, UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventStream for ChannelStream {
    fn send(&mut self, event: &ProgressEvent) -> Result<(), StreamError> {
        self.tx
            .send(event.clone())
            .map_err(|_| StreamError::Closed)
    }
}
