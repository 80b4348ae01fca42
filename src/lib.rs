// src/lib.rs
// =============================================================================
// cache-warmer: warms HTTP caches by requesting a list of URLs concurrently.
//
// Modules, from the bottom up:
// - config: RequestOptions and validation
// - crawl: Targets, outcomes, results and the concurrency pool
// - dispatch: Builds one request per target
// - client: Sends requests (reqwest, or any HttpClient you inject)
// - observer: Collects results, logs outcomes, reports progress
// - stream: Live-update channels for progress events
// - crawler: The Crawler that wires it all together
//
// Example:
//   let mut crawler = Crawler::new(RequestOptions::default())?
//       .with_stream(SseWriter::new(std::io::stderr()));
//   let result = crawler.crawl(&targets).await;
// =============================================================================

pub mod client;
pub mod config;
pub mod crawl;
pub mod crawler;
pub mod dispatch;
pub mod observer;
pub mod stream;

#[cfg(test)]
mod testing;

pub use client::{HttpClient, ReqwestClient, TransportError, TransportErrorKind};
pub use config::{ClientConfig, ConfigError, PerRequestOptions, RequestOptions, StatusPolicy};
pub use crawl::{parse_targets, CrawlOutcome, CrawlResult, CrawlTarget, SiteMetadata, WarmupState};
pub use crawler::{warm_up, CrawlError, Crawler};
pub use stream::{ChannelStream, EventStream, ProgressEvent, SseWriter, StreamError};
