// src/crawler.rs
// =============================================================================
// The crawler: single entry point for warming a list of URLs.
//
// What happens in `crawl`:
// 1. Build the observers: result collector -> log -> progress (if a stream
//    is attached)
// 2. Hand the targets to the concurrency pool
// 3. Wait until every target produced its outcome
// 4. Return the collected result
//
// Everything that can be wrong with the configuration is checked when the
// crawler is constructed, so `crawl` itself cannot fail: it always returns
// a result covering every target.
// =============================================================================

use std::io::Write;
use std::num::NonZeroUsize;
use std::sync::Arc;

use thiserror::Error;
use tracing::Level;

use crate::client::{HttpClient, ReqwestClient};
use crate::config::{ConfigError, RequestOptions};
use crate::crawl::{CrawlResult, CrawlTarget, Pool, TargetError};
use crate::dispatch::Dispatcher;
use crate::observer::{LogObserver, Observer, ProgressObserver, ResultCollector};
use crate::stream::EventStream;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Target(#[from] TargetError),
}

pub struct Crawler {
    options: RequestOptions,
    concurrency: NonZeroUsize,
    dispatcher: Dispatcher,
    client: Arc<dyn HttpClient>,
    stream: Option<Box<dyn EventStream>>,
    log_level: Level,
    log_sink: Option<Box<dyn Write + Send>>,
}

impl Crawler {
    /// Creates a crawler with a reqwest client built from `client_config`
    pub fn new(options: RequestOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let client = ReqwestClient::from_config(&options.client_config)?;
        Self::with_client(options, Arc::new(client))
    }

    /// Creates a crawler that sends its requests through `client`
    pub fn with_client(
        options: RequestOptions,
        client: Arc<dyn HttpClient>,
    ) -> Result<Self, ConfigError> {
        let dispatcher = Dispatcher::new(&options)?;
        let concurrency = NonZeroUsize::new(options.concurrency)
            .ok_or(ConfigError::InvalidConcurrency(options.concurrency))?;

        Ok(Self {
            options,
            concurrency,
            dispatcher,
            client,
            stream: None,
            log_level: Level::INFO,
            log_sink: None,
        })
    }

    /// Sends live progress events to `stream` during every crawl
    pub fn with_stream(mut self, stream: impl EventStream + 'static) -> Self {
        self.stream = Some(Box::new(stream));
        self
    }

    /// Least severe level that is still logged per URL
    pub fn with_log_level(mut self, level: Level) -> Self {
        self.log_level = level;
        self
    }

    /// Also writes every log record as a JSON line to `sink`
    pub fn with_log_sink(mut self, sink: impl Write + Send + 'static) -> Self {
        self.log_sink = Some(Box::new(sink));
        self
    }

    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    // Warms every target and returns which URLs succeeded and which failed
    //
    // Takes &mut self: one crawler runs one crawl at a time. Targets are
    // expected to be distinct, `parse_targets` takes care of that.
    pub async fn crawl(&mut self, targets: &[CrawlTarget]) -> CrawlResult {
        let total = targets.len();
        tracing::info!(
            total,
            concurrency = self.concurrency.get(),
            method = %self.options.request_method,
            "Starting cache warmup"
        );

        let collector = ResultCollector::new();
        let results = collector.handle();

        let mut observers: Vec<Box<dyn Observer + '_>> = Vec::new();
        observers.push(Box::new(collector));
        observers.push(Box::new(LogObserver::new(
            self.log_level,
            self.log_sink
                .as_mut()
                .map(|sink| &mut **sink as &mut (dyn Write + Send)),
        )));
        if let Some(stream) = self.stream.as_mut() {
            observers.push(Box::new(ProgressObserver::new(
                &mut **stream,
                total,
                results.clone(),
            )));
        }

        let pool = Pool::new(
            self.client.as_ref(),
            &self.dispatcher,
            self.concurrency,
            self.options.status_policy,
        );
        pool.run(targets, &mut observers).await;
        drop(observers);

        let result = results.snapshot();
        tracing::info!(
            successful = result.successful.len(),
            failed = result.failed.len(),
            state = ?result.state(),
            "Cache warmup finished"
        );
        result
    }
}

// Warms a list of URLs in one go
//
// Convenience wrapper: parses the URLs, builds a default crawler and runs it.
// Unlike `parse_targets`, a malformed URL here is an error.
pub async fn warm_up<S: AsRef<str>>(
    urls: &[S],
    options: RequestOptions,
) -> Result<CrawlResult, CrawlError> {
    let targets = urls
        .iter()
        .map(|url| CrawlTarget::new(url.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut crawler = Crawler::new(options)?;
    Ok(crawler.crawl(&targets).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StatusPolicy;
    use crate::testing::{ClosedStream, FakeClient, RecordingStream, SharedBuffer};
    use std::collections::HashSet;
    use std::time::Duration;

    fn targets(urls: &[&str]) -> Vec<CrawlTarget> {
        urls.iter().map(|u| CrawlTarget::new(u).unwrap()).collect()
    }

    fn options(concurrency: usize) -> RequestOptions {
        RequestOptions {
            concurrency,
            user_agent: "WarmupBot/1.0".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_success_and_timeout_with_concurrency_one() {
        let client = Arc::new(FakeClient::new().timeout("https://b.test/"));
        let stream = RecordingStream::default();
        let mut crawler = Crawler::with_client(options(1), client.clone())
            .unwrap()
            .with_stream(stream.clone());

        let result = crawler
            .crawl(&targets(&["https://a.test/", "https://b.test/"]))
            .await;

        assert_eq!(result.successful, vec!["https://a.test/"]);
        assert_eq!(result.failed, vec!["https://b.test/"]);
        assert_eq!(client.max_in_flight(), 1);

        let events = stream.events();
        assert_eq!(events.len(), 2);
        let last = events.last().unwrap();
        assert_eq!((last.completed, last.total, last.succeeded, last.failed), (2, 2, 1, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_five_urls_progress_monotonically() {
        let client = Arc::new(FakeClient::new().delay(Duration::from_millis(20)));
        let stream = RecordingStream::default();
        let mut crawler = Crawler::with_client(options(2), client.clone())
            .unwrap()
            .with_stream(stream.clone());

        let urls = [
            "https://site.test/1",
            "https://site.test/2",
            "https://site.test/3",
            "https://site.test/4",
            "https://site.test/5",
        ];
        let result = crawler.crawl(&targets(&urls)).await;

        assert_eq!(result.successful.len(), 5);
        assert!(result.failed.is_empty());
        assert!(client.max_in_flight() <= 2);

        let completed: Vec<_> = stream.events().iter().map(|e| e.completed).collect();
        assert_eq!(completed, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_terminal_event_matches_result() {
        let client = Arc::new(
            FakeClient::new()
                .respond("https://b.test/", Ok(404))
                .timeout("https://d.test/"),
        );
        let stream = RecordingStream::default();
        let mut crawler = Crawler::with_client(options(3), client)
            .unwrap()
            .with_stream(stream.clone());

        let result = crawler
            .crawl(&targets(&[
                "https://a.test/",
                "https://b.test/",
                "https://c.test/",
                "https://d.test/",
            ]))
            .await;

        let events = stream.events();
        let terminal = events.last().unwrap();
        assert!(terminal.is_terminal());
        assert_eq!(terminal.completed, terminal.total);
        assert_eq!(terminal.succeeded + terminal.failed, terminal.total);
        assert_eq!(terminal.successful_urls.as_ref(), Some(&result.successful));
        assert_eq!(terminal.failed_urls.as_ref(), Some(&result.failed));
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    }

    #[tokio::test]
    async fn test_every_target_in_exactly_one_list() {
        let urls: Vec<String> = (0..25).map(|i| format!("https://site.test/p{i}")).collect();
        let mut client = FakeClient::new();
        for url in urls.iter().step_by(3) {
            client = client.timeout(url);
        }
        let mut crawler = Crawler::with_client(options(4), Arc::new(client)).unwrap();

        let targets: Vec<_> = urls.iter().map(|u| CrawlTarget::new(u).unwrap()).collect();
        let result = crawler.crawl(&targets).await;

        assert_eq!(result.len(), 25);
        assert_eq!(result.failed.len(), 9);
        let all: HashSet<_> = result.successful.iter().chain(&result.failed).collect();
        assert_eq!(all.len(), 25);
        assert!(result.failed.iter().all(|u| !result.successful.contains(u)));
    }

    #[tokio::test]
    async fn test_empty_target_list() {
        let client = Arc::new(FakeClient::new());
        let stream = RecordingStream::default();
        let sink = SharedBuffer::default();
        let mut crawler = Crawler::with_client(options(2), client.clone())
            .unwrap()
            .with_stream(stream.clone())
            .with_log_sink(sink.clone());

        let result = crawler.crawl(&[]).await;

        assert!(result.is_empty());
        assert!(stream.events().is_empty());
        assert!(sink.contents().is_empty());
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_broken_stream_does_not_affect_result() {
        let client = Arc::new(FakeClient::new().timeout("https://c.test/"));
        let stream = ClosedStream::default();
        let mut crawler = Crawler::with_client(options(2), client)
            .unwrap()
            .with_stream(stream.clone());

        let result = crawler
            .crawl(&targets(&["https://a.test/", "https://b.test/", "https://c.test/"]))
            .await;

        assert_eq!(stream.attempts(), 3);
        assert_eq!(result.successful.len(), 2);
        assert_eq!(result.failed, vec!["https://c.test/"]);
    }

    #[tokio::test]
    async fn test_one_log_record_per_outcome() {
        let client = Arc::new(FakeClient::new().respond("https://b.test/", Ok(503)));
        let sink = SharedBuffer::default();
        let mut crawler = Crawler::with_client(options(2), client)
            .unwrap()
            .with_log_sink(sink.clone());

        crawler
            .crawl(&targets(&["https://a.test/", "https://b.test/"]))
            .await;

        let contents = sink.contents();
        let records: Vec<serde_json::Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        let failed = records.iter().find(|r| r["url"] == "https://b.test/").unwrap();
        assert_eq!(failed["success"], false);
        assert_eq!(failed["status"], 503);
    }

    #[tokio::test]
    async fn test_any_response_policy_counts_error_status_as_warmed() {
        let client = Arc::new(FakeClient::new().respond("https://b.test/", Ok(500)));
        let mut crawler = Crawler::with_client(
            RequestOptions {
                status_policy: StatusPolicy::AnyResponse,
                ..options(2)
            },
            client,
        )
        .unwrap();

        let result = crawler
            .crawl(&targets(&["https://a.test/", "https://b.test/"]))
            .await;
        assert_eq!(result.successful.len(), 2);
        assert!(result.failed.is_empty());
    }

    #[tokio::test]
    async fn test_requests_carry_identity() {
        let client = Arc::new(FakeClient::new());
        let mut crawler = Crawler::with_client(options(1), client.clone()).unwrap();

        crawler.crawl(&targets(&["https://a.test/"])).await;

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, reqwest::Method::GET);
        assert_eq!(
            requests[0].headers.get(reqwest::header::USER_AGENT).unwrap(),
            "WarmupBot/1.0"
        );
    }

    #[tokio::test]
    async fn test_crawler_is_reusable() {
        let client = Arc::new(FakeClient::new());
        let stream = RecordingStream::default();
        let mut crawler = Crawler::with_client(options(2), client)
            .unwrap()
            .with_stream(stream.clone());

        let first = crawler.crawl(&targets(&["https://a.test/"])).await;
        let second = crawler.crawl(&targets(&["https://b.test/"])).await;

        assert_eq!(first.successful, vec!["https://a.test/"]);
        assert_eq!(second.successful, vec!["https://b.test/"]);
        assert!(stream.events().iter().all(|e| e.total == 1));
    }

    #[test]
    fn test_invalid_configuration_fails_fast() {
        let result = Crawler::with_client(options(0), Arc::new(FakeClient::new()));
        assert!(matches!(result, Err(ConfigError::InvalidConcurrency(0))));
    }

    #[test]
    fn test_out_of_range_timeouts_are_config_errors() {
        let mut request_timeout = options(2);
        request_timeout.request_options.timeout_secs = Some(1e30);
        let result = Crawler::with_client(request_timeout, Arc::new(FakeClient::new()));
        assert!(matches!(result, Err(ConfigError::InvalidTimeout { .. })));

        let mut connect_timeout = options(2);
        connect_timeout.client_config.connect_timeout_secs = Some(1e30);
        assert!(matches!(
            Crawler::new(connect_timeout),
            Err(ConfigError::InvalidTimeout { .. })
        ));
    }

    #[tokio::test]
    async fn test_warm_up_rejects_malformed_url() {
        let result = warm_up(&["https://a.test/", "no scheme"], RequestOptions::default()).await;
        assert!(matches!(result, Err(CrawlError::Target(_))));
    }
}
