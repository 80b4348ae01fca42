// src/observer/log.rs
// =============================================================================
// Logs one structured record per finished request.
//
// Every record goes to `tracing` (info for warmed URLs, error for failed
// ones). Optionally, the same record is appended as a JSON line to a sink,
// e.g. a log file. A failing sink is reported once and then ignored.
// =============================================================================

use std::io::Write;

use serde::Serialize;
use tracing::Level;

use super::Observer;
use crate::crawl::CrawlOutcome;

/// The logged form of an outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord<'a> {
    pub url: &'a str,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

impl<'a> From<&'a CrawlOutcome> for LogRecord<'a> {
    fn from(outcome: &'a CrawlOutcome) -> Self {
        Self {
            url: &outcome.url,
            success: outcome.success,
            status: outcome.status,
            duration_ms: u64::try_from(outcome.elapsed.as_millis()).unwrap_or(u64::MAX),
            error: outcome.error.as_deref(),
        }
    }
}

pub struct LogObserver<'a> {
    min_level: Level,
    sink: Option<&'a mut (dyn Write + Send)>,
    sink_broken: bool,
}

impl<'a> LogObserver<'a> {
    // min_level works like a log level setting: Level::ERROR logs failed URLs
    // only, Level::INFO (or more verbose) logs every URL
    pub fn new(min_level: Level, sink: Option<&'a mut (dyn Write + Send)>) -> Self {
        Self {
            min_level,
            sink,
            sink_broken: false,
        }
    }

    fn write_record(&mut self, record: &LogRecord<'_>) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        if self.sink_broken {
            return;
        }

        let written = serde_json::to_writer(&mut *sink, record)
            .map_err(std::io::Error::from)
            .and_then(|()| sink.write_all(b"\n"))
            .and_then(|()| sink.flush());

        if let Err(e) = written {
            tracing::warn!(error = %e, "Log sink failed, further records are only sent to the logger");
            self.sink_broken = true;
        }
    }
}

impl Observer for LogObserver<'_> {
    fn on_outcome(&mut self, outcome: &CrawlOutcome) {
        let record = LogRecord::from(outcome);
        let level = if record.success { Level::INFO } else { Level::ERROR };

        // tracing orders levels by verbosity: ERROR < WARN < INFO < DEBUG
        if level > self.min_level {
            return;
        }

        if record.success {
            tracing::info!(
                url = record.url,
                success = record.success,
                status = record.status,
                duration_ms = record.duration_ms,
                "URL warmed"
            );
        } else {
            tracing::error!(
                url = record.url,
                success = record.success,
                status = record.status,
                duration_ms = record.duration_ms,
                error = record.error,
                "URL failed"
            );
        }

        self.write_record(&record);
    }
}
