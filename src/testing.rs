// src/testing.rs
// =============================================================================
// Test helpers shared by the unit tests of several modules.
//
// - FakeClient: an in-memory HttpClient with scripted responses and an
//   in-flight counter, so tests never touch the network
// - RecordingObserver / RecordingStream: remember what they were given
// - SharedBuffer / FailingWriter: io::Write sinks for log and SSE tests
// =============================================================================

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::client::{HttpClient, TransportError, TransportErrorKind};
use crate::crawl::CrawlOutcome;
use crate::dispatch::RequestDescriptor;
use crate::observer::Observer;
use crate::stream::{EventStream, ProgressEvent, StreamError};

#[derive(Debug, Default)]
pub struct FakeClient {
    responses: HashMap<String, Result<u16, TransportError>>,
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    requests: Mutex<Vec<RequestDescriptor>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every URL without a scripted response answers 200
    pub fn respond(mut self, url: &str, response: Result<u16, TransportError>) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn timeout(self, url: &str) -> Self {
        self.respond(
            url,
            Err(TransportError::new(
                TransportErrorKind::Timeout,
                "operation timed out",
            )),
        )
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn delay_for(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for FakeClient {
    async fn execute(&self, request: RequestDescriptor) -> Result<u16, TransportError> {
        let url = request.url.to_string();
        self.requests.lock().unwrap().push(request);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.get(&url).copied().unwrap_or(self.default_delay);
        tokio::time::sleep(delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.responses.get(&url).cloned().unwrap_or(Ok(200))
    }
}

/// Appends "<name>:<url>" to a shared log for every outcome
pub struct RecordingObserver {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl RecordingObserver {
    pub fn new(name: &'static str, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self { name, log }
    }
}

impl Observer for RecordingObserver {
    fn on_outcome(&mut self, outcome: &CrawlOutcome) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}", self.name, outcome.url));
    }
}

/// Keeps every event it was sent, in order
#[derive(Debug, Clone, Default)]
pub struct RecordingStream {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl RecordingStream {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventStream for RecordingStream {
    fn send(&mut self, event: &ProgressEvent) -> Result<(), StreamError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// A stream whose consumer is gone, every send fails
#[derive(Debug, Clone, Default)]
pub struct ClosedStream {
    attempts: Arc<AtomicUsize>,
}

impl ClosedStream {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl EventStream for ClosedStream {
    fn send(&mut self, _event: &ProgressEvent) -> Result<(), StreamError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StreamError::Closed)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.bytes.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }
}
