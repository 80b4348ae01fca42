// src/crawl/target.rs
// =============================================================================
// A crawl target is one URL whose cache should be warmed.
//
// Targets are validated when they are created: only absolute http(s) URLs
// can become a CrawlTarget, so the pool never sees a malformed URL.
// The site/language metadata is carried along untouched for callers that
// discovered the URLs per site (e.g. from a multi-language sitemap).
// =============================================================================

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("invalid URL '{url}': {source}")]
    Invalid {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported scheme '{scheme}' in '{url}', only http and https can be warmed")]
    UnsupportedScheme { url: String, scheme: String },
}

/// Site and language a target was discovered for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteMetadata {
    pub site: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    url: Url,
    metadata: SiteMetadata,
}

impl CrawlTarget {
    pub fn new(url: &str) -> Result<Self, TargetError> {
        let parsed = Url::parse(url.trim()).map_err(|source| TargetError::Invalid {
            url: url.to_string(),
            source,
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(Self {
                url: parsed,
                metadata: SiteMetadata::default(),
            }),
            scheme => Err(TargetError::UnsupportedScheme {
                url: url.to_string(),
                scheme: scheme.to_string(),
            }),
        }
    }

    pub fn with_metadata(mut self, metadata: SiteMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn metadata(&self) -> &SiteMetadata {
        &self.metadata
    }
}

// Parses a list of URL lines into targets
//
// This is the upstream filter in front of the crawler:
// - blank lines and lines starting with '#' are ignored
// - duplicate URLs are kept once (first occurrence wins)
// - malformed URLs are returned separately instead of being crawled
//
// Returns: (valid targets, rejected lines with their error)
pub fn parse_targets<I, S>(lines: I) -> (Vec<CrawlTarget>, Vec<TargetError>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut targets = Vec::new();
    let mut rejected = Vec::new();

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match CrawlTarget::new(line) {
            Ok(target) => {
                if seen.insert(target.as_str().to_string()) {
                    targets.push(target);
                }
            }
            Err(e) => rejected.push(e),
        }
    }

    (targets, rejected)
}
