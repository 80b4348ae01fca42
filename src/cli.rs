// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Command-line flags override whatever a --config file sets, and the file
// overrides the built-in defaults.
// =============================================================================

use std::io::Stdout;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};

use cache_warmer::{RequestOptions, SseWriter, StatusPolicy};

#[derive(Parser, Debug)]
#[command(
    name = "cache-warmer",
    version,
    about = "Warm HTTP caches by crawling a list of URLs concurrently",
    long_about = "cache-warmer requests every given URL with a bounded number of concurrent \
                  requests so that caches (reverse proxies, CDNs, page caches) are filled \
                  before real visitors arrive."
)]
pub struct Cli {
    /// Show debug output (same as RUST_LOG=debug)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Warm the caches of the given URLs
    ///
    /// Example: cache-warmer warm https://example.com/ --file urls.txt --concurrency 10
    Warm(WarmArgs),

    /// Validate a config file and print the resulting options as JSON
    ///
    /// Example: cache-warmer check-config warming.json
    CheckConfig {
        /// Path to a JSON config file
        config: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct WarmArgs {
    /// URLs to warm
    pub urls: Vec<String>,

    /// Read more URLs from a file, one per line ('#' starts a comment)
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    /// JSON config file with request options
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Maximum number of concurrent requests
    #[arg(long, short)]
    pub concurrency: Option<usize>,

    /// HTTP method of the warm-up requests (e.g. GET, HEAD)
    #[arg(long)]
    pub method: Option<String>,

    /// User-Agent sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Extra header as "Name: value", can be repeated
    #[arg(long = "header", short = 'H')]
    pub headers: Vec<String>,

    /// Timeout per request in seconds
    #[arg(long)]
    pub timeout: Option<f64>,

    /// Count any received response as warmed, including 4xx and 5xx
    #[arg(long)]
    pub any_status: bool,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// Stream live progress as server-sent events to stdout, before the report
    #[arg(long)]
    pub progress: bool,

    /// Only log failed URLs
    #[arg(long)]
    pub quiet: bool,

    /// Append one JSON record per URL to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl WarmArgs {
    // Builds the request options: defaults <- config file <- flags
    pub fn request_options(&self) -> Result<RequestOptions> {
        let mut options = match &self.config {
            Some(path) => RequestOptions::from_json_file(path)?,
            None => RequestOptions::default(),
        };

        if let Some(concurrency) = self.concurrency {
            options.concurrency = concurrency;
        }
        if let Some(method) = &self.method {
            options.request_method = method.to_uppercase();
        }
        if let Some(user_agent) = &self.user_agent {
            options.user_agent = user_agent.clone();
        }
        if let Some(timeout) = self.timeout {
            options.request_options.timeout_secs = Some(timeout);
        }
        if self.any_status {
            options.status_policy = StatusPolicy::AnyResponse;
        }

        for header in &self.headers {
            let (name, value) = parse_header(header)?;
            // A flag replaces a header of the same name from the config file
            options
                .request_headers
                .retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
            options.request_headers.insert(name, value);
        }

        options.validate()?;
        Ok(options)
    }

    // Progress frames go to stdout, logs stay on stderr
    pub fn progress_stream(&self) -> Option<SseWriter<Stdout>> {
        self.progress.then(|| SseWriter::new(std::io::stdout()))
    }

    // All URL lines from the arguments and the --file, in that order
    pub fn url_lines(&self) -> Result<Vec<String>> {
        let mut lines = self.urls.clone();

        if let Some(path) = &self.file {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Could not read URL file {}", path.display()))?;
            lines.extend(content.lines().map(str::to_string));
        }

        Ok(lines)
    }
}

// Parses "Name: value" into its two parts
fn parse_header(header: &str) -> Result<(String, String)> {
    let (name, value) = header
        .split_once(':')
        .ok_or_else(|| anyhow!("Invalid header '{}', expected \"Name: value\"", header))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("Invalid header '{}', name is empty", header));
    }

    Ok((name.to_string(), value.trim().to_string()))
}
