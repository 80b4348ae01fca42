// src/observer/mod.rs
// =============================================================================
// Observers react to every finished warm-up request.
//
// Submodules:
// - collector: Builds the CrawlResult
// - log: Writes one structured log record per outcome
// - progress: Pushes progress events to a live-update stream
//
// The pool calls the observers one after another, in the order they were
// registered, for every outcome. The crawler registers them as
// collector -> log -> progress, so the progress observer can read the
// collector's result when the last outcome arrives.
// =============================================================================

mod collector;
mod log;
mod progress;

pub use collector::{ResultCollector, ResultHandle};
pub use log::{LogObserver, LogRecord};
pub use progress::ProgressObserver;

use crate::crawl::CrawlOutcome;

// Something that wants to know about every finished request
//
// `on_outcome` cannot fail: an observer that hits an error (a closed stream,
// a broken log file) handles it itself, the crawl goes on regardless.
pub trait Observer: Send {
    fn on_outcome(&mut self, outcome: &CrawlOutcome);
}
