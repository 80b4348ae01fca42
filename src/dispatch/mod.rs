// src/dispatch/mod.rs
// =============================================================================
// This module turns a crawl target into a concrete outbound request.
//
// The dispatcher is built once per crawl from the validated RequestOptions.
// It pre-computes the method, the header map and the timeout, so building a
// request per target is a pure, cheap transformation.
//
// Header merge order:
// 1. Headers from `request_headers`
// 2. The identifying User-Agent, which replaces any User-Agent from step 1
// =============================================================================

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::Method;
use url::Url;

use crate::config::{ConfigError, RequestOptions};
use crate::crawl::CrawlTarget;

/// Everything the HTTP client needs to send one warm-up request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    method: Method,
    headers: HeaderMap,
    timeout: Option<Duration>,
}

impl Dispatcher {
    pub fn new(options: &RequestOptions) -> Result<Self, ConfigError> {
        options.validate()?;

        let method = options.method()?;

        let mut headers = HeaderMap::new();
        for (name, value) in &options.request_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ConfigError::InvalidHeaderName(name.clone()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| ConfigError::InvalidHeaderValue(name.clone()))?;
            headers.insert(header_name, header_value);
        }

        // HeaderMap keys are case-insensitive, so this also replaces a
        // "user-agent" entry from request_headers
        let user_agent = HeaderValue::from_str(&options.user_agent)
            .map_err(|_| ConfigError::InvalidHeaderValue(USER_AGENT.to_string()))?;
        headers.insert(USER_AGENT, user_agent);

        Ok(Self {
            method,
            headers,
            timeout: options.request_options.timeout(),
        })
    }

    pub fn build(&self, target: &CrawlTarget) -> RequestDescriptor {
        RequestDescriptor {
            method: self.method.clone(),
            url: target.url().clone(),
            headers: self.headers.clone(),
            timeout: self.timeout,
        }
    }
}
