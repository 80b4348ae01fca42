// src/client/mod.rs
// =============================================================================
// This module sends warm-up requests over HTTP.
//
// Key functionality:
// - HttpClient: the capability the crawler needs ("send this request, tell me
//   the status code"), so tests can swap in a fake client
// - ReqwestClient: the real implementation built from ClientConfig
// - Detects various failure modes (timeout, DNS, TLS, redirect loops, etc.)
//
// Rust concepts:
// - Traits: HttpClient is an interface with several implementations
// - async-trait: async methods in a trait that can be used as `dyn HttpClient`
// - Arc<dyn Trait>: one client shared by all in-flight requests
// =============================================================================

use std::fmt;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, Proxy};
use serde::Serialize;
use thiserror::Error;

use crate::config::{ClientConfig, ConfigError};
use crate::dispatch::RequestDescriptor;

// Anything that can send a warm-up request
//
// Implementations must be safe to share between concurrent requests
// (Send + Sync), the pool calls `execute` from many futures at once.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends the request and returns the HTTP status code of the response
    async fn execute(&self, request: RequestDescriptor) -> Result<u16, TransportError>;
}

/// Why a request did not produce a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    /// Request timed out
    Timeout,
    /// Could not resolve hostname
    Dns,
    /// Connection refused or reset
    Connect,
    /// SSL/TLS certificate error
    Tls,
    /// Too many redirects (redirect loop)
    RedirectLoop,
    /// Other error
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Dns => "dns error",
            TransportErrorKind::Connect => "connection failed",
            TransportErrorKind::Tls => "tls error",
            TransportErrorKind::RedirectLoop => "too many redirects",
            TransportErrorKind::Other => "error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

// The default client, a thin wrapper around reqwest::Client
//
// reqwest::Client is cheap to clone (it's reference counted internally) and
// keeps a connection pool, so one instance serves the whole crawl.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: Client,
}

impl ReqwestClient {
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let redirect = if config.max_redirects == 0 {
            Policy::none()
        } else {
            Policy::limited(config.max_redirects)
        };

        let mut builder = Client::builder()
            .redirect(redirect)
            .danger_accept_invalid_certs(config.accept_invalid_certs);

        if let Some(connect_timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(connect_timeout);
        }

        if let Some(proxy_url) = &config.proxy {
            let proxy = Proxy::all(proxy_url).map_err(|source| ConfigError::InvalidProxy {
                url: proxy_url.clone(),
                source,
            })?;
            builder = builder.proxy(proxy);
        }

        let inner = builder.build().map_err(ConfigError::Client)?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn execute(&self, request: RequestDescriptor) -> Result<u16, TransportError> {
        let RequestDescriptor {
            method,
            url,
            headers,
            timeout,
        } = request;

        let mut builder = self.inner.request(method, url.clone()).headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(categorize_error)?;
        let status = response.status().as_u16();

        // Read the body so the server finishes rendering the page. The status
        // is already known, a broken body stream does not undo the warm-up.
        if let Err(e) = response.bytes().await {
            tracing::debug!(url = %url, error = %e, "Failed to read response body");
        }

        Ok(status)
    }
}

// Categorizes different error types from reqwest
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - Too many redirects
fn categorize_error(error: reqwest::Error) -> TransportError {
    let error_string = error.to_string();
    let lowercase = error_string.to_lowercase();

    let kind = if error.is_timeout() {
        TransportErrorKind::Timeout
    } else if error.is_redirect() {
        TransportErrorKind::RedirectLoop
    } else if lowercase.contains("certificate")
        || lowercase.contains("ssl")
        || lowercase.contains("tls")
    {
        TransportErrorKind::Tls
    } else if error.is_connect() {
        // Connection errors often mean DNS issues or host unreachable
        if lowercase.contains("dns") || lowercase.contains("resolve") {
            TransportErrorKind::Dns
        } else {
            TransportErrorKind::Connect
        }
    } else {
        TransportErrorKind::Other
    };

    TransportError::new(kind, error_string)
}
