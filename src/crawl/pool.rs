// src/crawl/pool.rs
// =============================================================================
// Runs the warm-up requests with a concurrency limit.
//
// How it works:
// 1. Turn every target into a future that sends its request
// 2. Run up to `concurrency` of them at once with buffer_unordered
// 3. As soon as one finishes, the next queued target starts
// 4. Every finished request becomes a CrawlOutcome, which is handed to each
//    observer in order, one outcome at a time
//
// The observers are called from this single loop, so they never run
// concurrently with each other and don't need to be thread-safe among
// themselves. A transport error is just a failed outcome, nothing here can
// abort the crawl.
// =============================================================================

use std::num::NonZeroUsize;

use futures::stream::{self, StreamExt};
use tokio::time::Instant;

use super::{CrawlOutcome, CrawlTarget};
use crate::client::HttpClient;
use crate::config::StatusPolicy;
use crate::dispatch::Dispatcher;
use crate::observer::Observer;

pub struct Pool<'a> {
    client: &'a dyn HttpClient,
    dispatcher: &'a Dispatcher,
    concurrency: NonZeroUsize,
    policy: StatusPolicy,
}

impl<'a> Pool<'a> {
    pub fn new(
        client: &'a dyn HttpClient,
        dispatcher: &'a Dispatcher,
        concurrency: NonZeroUsize,
        policy: StatusPolicy,
    ) -> Self {
        Self {
            client,
            dispatcher,
            concurrency,
            policy,
        }
    }

    // Crawls every target and returns the number of delivered outcomes
    //
    // Returns only once all targets produced their outcome and every
    // observer has seen it. With no targets, no observer is called.
    pub async fn run(
        &self,
        targets: &[CrawlTarget],
        observers: &mut [Box<dyn Observer + '_>],
    ) -> usize {
        if targets.is_empty() {
            return 0;
        }

        let mut outcomes = stream::iter(targets)
            .map(|target| self.execute(target))
            .buffer_unordered(self.concurrency.get());

        let mut delivered = 0;
        while let Some(outcome) = outcomes.next().await {
            for observer in observers.iter_mut() {
                observer.on_outcome(&outcome);
            }
            delivered += 1;
        }

        debug_assert_eq!(delivered, targets.len());
        delivered
    }

    async fn execute(&self, target: &CrawlTarget) -> CrawlOutcome {
        let request = self.dispatcher.build(target);
        tracing::debug!(url = %target.as_str(), method = %request.method, "Sending warm-up request");

        let started = Instant::now();
        let response = self.client.execute(request).await;

        CrawlOutcome::from_response(
            target.as_str().to_string(),
            response,
            started.elapsed(),
            self.policy,
        )
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why buffer_unordered and not tokio::spawn?
//    - buffer_unordered(N) polls up to N futures at once on the current task
//    - Warm-up requests are network I/O, so one task is enough to keep them busy
//    - The futures can borrow the dispatcher and client, no Arc cloning needed
//
// 2. Why call observers in the `while let` loop?
//    - The loop body runs for one outcome at a time
//    - That gives every observer a strict order without any locking
//    - Other requests keep their place in the buffer and resume afterwards
//
// 3. What is NonZeroUsize?
//    - A usize that can never be 0, checked once when it is created
//    - buffer_unordered(0) would never make progress, the type rules it out
// -----------------------------------------------------------------------------
