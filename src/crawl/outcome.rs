// src/crawl/outcome.rs
// =============================================================================
// The outcome of one warm-up request, and the aggregated crawl result.
// =============================================================================

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::TransportError;
use crate::config::StatusPolicy;

// Represents the result of warming a single URL
//
// Exactly one outcome exists per target. It is created by the pool and
// handed to every observer by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlOutcome {
    /// The URL that was requested
    pub url: String,
    /// Whether the URL counts as warmed
    pub success: bool,
    /// HTTP status, if a response was received
    pub status: Option<u16>,
    /// Time from sending the request to receiving the response or error
    pub elapsed: Duration,
    /// Why the request failed, if it did
    pub error: Option<String>,
}

impl CrawlOutcome {
    // Builds an outcome from what the HTTP client returned
    //
    // A received response is classified by the status policy, a transport
    // error is always a failure.
    pub fn from_response(
        url: String,
        response: Result<u16, TransportError>,
        elapsed: Duration,
        policy: StatusPolicy,
    ) -> Self {
        match response {
            Ok(status) => {
                let success = policy.is_success(status);
                Self {
                    url,
                    success,
                    status: Some(status),
                    elapsed,
                    error: (!success).then(|| format!("HTTP {status}")),
                }
            }
            Err(e) => Self {
                url,
                success: false,
                status: None,
                elapsed,
                error: Some(e.to_string()),
            },
        }
    }
}

/// URLs of a crawl, split by outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlResult {
    pub successful: Vec<String>,
    pub failed: Vec<String>,
}

impl CrawlResult {
    pub fn add(&mut self, outcome: &CrawlOutcome) {
        if outcome.success {
            self.successful.push(outcome.url.clone());
        } else {
            self.failed.push(outcome.url.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.successful.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_successful(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn state(&self) -> WarmupState {
        WarmupState::of(self)
    }
}

// Overall state of a warm-up, as reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarmupState {
    /// Every URL was warmed
    Success,
    /// Some URLs failed
    Warning,
    /// Every URL failed
    Failed,
    /// Nothing was crawled
    Unknown,
}

impl WarmupState {
    pub fn of(result: &CrawlResult) -> Self {
        match (result.successful.is_empty(), result.failed.is_empty()) {
            (true, true) => WarmupState::Unknown,
            (false, true) => WarmupState::Success,
            (true, false) => WarmupState::Failed,
            (false, false) => WarmupState::Warning,
        }
    }
}
