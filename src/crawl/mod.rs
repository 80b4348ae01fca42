// src/crawl/mod.rs
// =============================================================================
// This module handles the crawl itself.
//
// Submodules:
// - target: What to crawl (validated URLs plus site metadata)
// - outcome: What came back (per-URL outcomes and the aggregated result)
// - pool: How it runs (bounded concurrency, ordered observer fan-out)
// =============================================================================

mod outcome;
mod pool;
mod target;

pub use outcome::{CrawlOutcome, CrawlResult, WarmupState};
pub use pool::Pool;
pub use target::{parse_targets, CrawlTarget, SiteMetadata, TargetError};
