// src/observer/progress.rs
// =============================================================================
// Pushes a progress event to a live-update stream after every request.
//
// The observer counts completed / succeeded / failed requests against the
// total known up front. The event for the last outcome is the terminal one
// and also carries the final URL lists, read from the result collector.
// This only works because the collector runs before this observer.
//
// A stream that fails to send is logged once and otherwise ignored: progress
// reporting is a convenience, the crawl result does not depend on it.
// =============================================================================

use super::{Observer, ResultHandle};
use crate::crawl::CrawlOutcome;
use crate::stream::{EventStream, ProgressEvent};

pub struct ProgressObserver<'a> {
    stream: &'a mut dyn EventStream,
    results: ResultHandle,
    total: usize,
    completed: usize,
    succeeded: usize,
    failed: usize,
    stream_failed: bool,
}

impl<'a> ProgressObserver<'a> {
    pub fn new(stream: &'a mut dyn EventStream, total: usize, results: ResultHandle) -> Self {
        Self {
            stream,
            results,
            total,
            completed: 0,
            succeeded: 0,
            failed: 0,
            stream_failed: false,
        }
    }

    fn next_event(&mut self, outcome: &CrawlOutcome) -> ProgressEvent {
        self.completed += 1;
        if outcome.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }

        let mut event = ProgressEvent {
            completed: self.completed,
            total: self.total,
            succeeded: self.succeeded,
            failed: self.failed,
            successful_urls: None,
            failed_urls: None,
        };

        if self.completed == self.total {
            let result = self.results.snapshot();
            event.successful_urls = Some(result.successful);
            event.failed_urls = Some(result.failed);
        }

        event
    }
}

impl Observer for ProgressObserver<'_> {
    fn on_outcome(&mut self, outcome: &CrawlOutcome) {
        let event = self.next_event(outcome);

        if let Err(e) = self.stream.send(&event) {
            if self.stream_failed {
                tracing::debug!(error = %e, completed = event.completed, "Progress event dropped");
            } else {
                tracing::warn!(error = %e, "Progress stream failed, continuing without live updates");
                self.stream_failed = true;
            }
        }
    }
}
