// src/stream/event.rs
// =============================================================================
// The progress message sent after every finished request.
//
// On the wire (JSON, camelCase):
//   {"completed":3,"total":10,"succeeded":2,"failed":1}
// The terminal event additionally carries both URL lists:
//   {..., "successfulUrls":[...], "failedUrls":[...]}
// =============================================================================

use serde::{Deserialize, Serialize};

/// Event name of intermediate progress events
pub const PROGRESS_EVENT: &str = "warmupProgress";

/// Event name of the terminal event
pub const FINISHED_EVENT: &str = "warmupFinished";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub completed: usize,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successful_urls: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_urls: Option<Vec<String>>,
}

impl ProgressEvent {
    pub fn is_terminal(&self) -> bool {
        self.successful_urls.is_some() && self.failed_urls.is_some()
    }

    pub fn name(&self) -> &'static str {
        if self.is_terminal() {
            FINISHED_EVENT
        } else {
            PROGRESS_EVENT
        }
    }

    /// Share of finished requests, between 0.0 and 1.0
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}
