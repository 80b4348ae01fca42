// src/config/options.rs
// =============================================================================
// Options that control every warm-up request.
//
// The options come from an outside configuration source (a JSON file, the
// CLI flags, or code) and are validated exactly once, before the crawl
// starts. A crawl never begins with options that could fail later on.
//
// Rust concepts:
// - serde defaults: Every field can be omitted in a config file
// - validate(): Checks every invariant once, up front
// - BTreeMap: Deterministic header ordering
// =============================================================================

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Concurrency used when nothing else is configured
pub const DEFAULT_CONCURRENCY: usize = 5;

/// User agent sent when the caller does not provide its own identity
pub const DEFAULT_USER_AGENT: &str = concat!("cache-warmer/", env!("CARGO_PKG_VERSION"));

// Options for the whole crawl
//
// Field names follow the snake_case keys used in config files:
//   { "concurrency": 10, "request_method": "HEAD", "request_headers": {...} }
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    /// Maximum number of requests in flight at the same time
    pub concurrency: usize,
    /// HTTP method of every warm-up request
    pub request_method: String,
    /// Extra headers sent with every request
    pub request_headers: BTreeMap<String, String>,
    /// Identity sent as User-Agent, wins over any User-Agent in request_headers
    pub user_agent: String,
    /// Options applied to each single request
    pub request_options: PerRequestOptions,
    /// Options used to construct the HTTP client
    pub client_config: ClientConfig,
    /// How HTTP status codes map to success or failure
    pub status_policy: StatusPolicy,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            request_method: Method::GET.to_string(),
            request_headers: BTreeMap::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_options: PerRequestOptions::default(),
            client_config: ClientConfig::default(),
            status_policy: StatusPolicy::default(),
        }
    }
}

// Per-request options
//
// Timeouts are given in seconds in config files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerRequestOptions {
    /// Total time allowed for one request, including reading the response
    pub timeout_secs: Option<f64>,
}

impl PerRequestOptions {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}

// Options for building the default reqwest client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Time allowed to establish a connection
    pub connect_timeout_secs: Option<f64>,
    /// Maximum number of redirects to follow (0 disables redirects)
    pub max_redirects: usize,
    /// Optional proxy for all requests (e.g. "http://127.0.0.1:8080")
    pub proxy: Option<String>,
    /// Accept invalid TLS certificates, useful for staging systems
    pub accept_invalid_certs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: None,
            max_redirects: 10,
            proxy: None,
            accept_invalid_certs: false,
        }
    }
}

impl ClientConfig {
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}

// Decides whether a received response counts as a warmed URL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// 4xx and 5xx responses are failures
    #[default]
    ErrorStatusFails,
    /// Any received response is a success, whatever its status
    AnyResponse,
}

impl StatusPolicy {
    pub fn is_success(self, status: u16) -> bool {
        match self {
            StatusPolicy::ErrorStatusFails => status < 400,
            StatusPolicy::AnyResponse => true,
        }
    }
}

impl RequestOptions {
    /// Loads options from a JSON file, missing fields use their defaults
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    // The request method in its canonical upper-case form ("head" -> HEAD)
    pub fn method(&self) -> Result<Method, ConfigError> {
        Method::from_bytes(self.request_method.to_ascii_uppercase().as_bytes())
            .map_err(|_| ConfigError::InvalidMethod(self.request_method.clone()))
    }

    // Checks every invariant of the options
    //
    // Called by the dispatcher and the crawler before anything is sent,
    // so a broken configuration fails fast instead of failing per request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency < 1 {
            return Err(ConfigError::InvalidConcurrency(self.concurrency));
        }

        self.method()?;

        // Header names are case-insensitive, so "accept" and "Accept" collide
        let mut seen = HashMap::new();
        for (name, value) in &self.request_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ConfigError::InvalidHeaderName(name.clone()))?;
            HeaderValue::from_str(value)
                .map_err(|_| ConfigError::InvalidHeaderValue(name.clone()))?;

            if let Some(previous) = seen.insert(header_name, name.clone()) {
                return Err(ConfigError::DuplicateHeader(previous, name.clone()));
            }
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::MissingUserAgent);
        }
        HeaderValue::from_str(&self.user_agent)
            .map_err(|_| ConfigError::InvalidHeaderValue("User-Agent".to_string()))?;

        check_secs("request_options.timeout_secs", self.request_options.timeout_secs)?;
        check_secs(
            "client_config.connect_timeout_secs",
            self.client_config.connect_timeout_secs,
        )?;

        Ok(())
    }
}

// A timeout must be positive and fit into a Duration
fn check_secs(field: &'static str, secs: Option<f64>) -> Result<(), ConfigError> {
    match secs {
        Some(secs) if secs <= 0.0 || Duration::try_from_secs_f64(secs).is_err() => {
            Err(ConfigError::InvalidTimeout { field, secs })
        }
        _ => Ok(()),
    }
}
