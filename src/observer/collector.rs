// src/observer/collector.rs
// =============================================================================
// Collects outcomes into the CrawlResult.
//
// The result lives behind Arc<Mutex<..>> so the crawler and the progress
// observer can read a snapshot while the collector is owned by the pool.
// =============================================================================

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::Observer;
use crate::crawl::{CrawlOutcome, CrawlResult};

/// Shared read access to the result being collected
#[derive(Debug, Clone, Default)]
pub struct ResultHandle {
    result: Arc<Mutex<CrawlResult>>,
}

impl ResultHandle {
    /// Copy of the result as it is right now (partial while the crawl runs)
    pub fn snapshot(&self) -> CrawlResult {
        self.lock().clone()
    }

    fn add(&self, outcome: &CrawlOutcome) {
        self.lock().add(outcome);
    }

    // A panic in another holder cannot leave a half-added URL behind, so a
    // poisoned lock still holds a consistent result.
    fn lock(&self) -> MutexGuard<'_, CrawlResult> {
        self.result.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Default)]
pub struct ResultCollector {
    result: ResultHandle,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> ResultHandle {
        self.result.clone()
    }
}

impl Observer for ResultCollector {
    fn on_outcome(&mut self, outcome: &CrawlOutcome) {
        self.result.add(outcome);
    }
}
