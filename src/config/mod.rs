// src/config/mod.rs
// =============================================================================
// This module holds the crawl configuration and its error type.
//
// Submodules:
// - options: RequestOptions and the per-request / client options inside it
// =============================================================================

mod options;

pub use options::{
    ClientConfig, PerRequestOptions, RequestOptions, StatusPolicy, DEFAULT_CONCURRENCY,
    DEFAULT_USER_AGENT,
};

use thiserror::Error;

/// Errors raised before a crawl starts because the configuration is unusable
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("concurrency must be at least 1, got {0}")]
    InvalidConcurrency(usize),

    #[error("invalid request method '{0}'")]
    InvalidMethod(String),

    #[error("invalid header name '{0}'")]
    InvalidHeaderName(String),

    #[error("invalid value for header '{0}'")]
    InvalidHeaderValue(String),

    #[error("header '{0}' and '{1}' are the same header")]
    DuplicateHeader(String, String),

    #[error("a User-Agent identity is required")]
    MissingUserAgent,

    #[error("{field} must be a positive number of seconds, got {secs}")]
    InvalidTimeout { field: &'static str, secs: f64 },

    #[error("invalid proxy '{url}': {source}")]
    InvalidProxy {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
