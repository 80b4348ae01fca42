// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing) on stderr
// 3. Load the URLs and options, run the crawler
// 4. Print the report and exit with a proper code
//    (0 = all warmed, 1 = some URLs failed, 2 = error)
// =============================================================================

mod cli;

use std::fs::OpenOptions;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use cache_warmer::{parse_targets, CrawlResult, Crawler, WarmupState};
use cli::{Cli, Commands, WarmArgs};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so stdout only carries progress frames and the report
//
// RUST_LOG wins over --verbose when it is set
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Warm(args) => handle_warm(&args).await,
        Commands::CheckConfig { config } => {
            let options = cache_warmer::RequestOptions::from_json_file(&config)?;
            options.validate()?;
            println!("{}", serde_json::to_string_pretty(&options)?);
            Ok(0)
        }
    }
}

// Handles the 'warm' subcommand
async fn handle_warm(args: &WarmArgs) -> Result<i32> {
    let options = args.request_options()?;

    let (targets, rejected) = parse_targets(args.url_lines()?);
    for error in &rejected {
        tracing::warn!("Skipping {}", error);
    }

    if targets.is_empty() {
        tracing::warn!("No URLs to warm");
        return Ok(0);
    }

    let mut crawler = Crawler::new(options)?;
    if args.quiet {
        crawler = crawler.with_log_level(Level::ERROR);
    }
    if let Some(stream) = args.progress_stream() {
        crawler = crawler.with_stream(stream);
    }
    if let Some(path) = &args.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Could not open log file {}", path.display()))?;
        crawler = crawler.with_log_sink(file);
    }

    let result = crawler.crawl(&targets).await;

    print_results(&result, args.json)?;

    if result.is_successful() {
        Ok(0)
    } else {
        Ok(1)
    }
}

// Prints the result either as a table or JSON
fn print_results(result: &CrawlResult, json: bool) -> Result<()> {
    if json {
        let report = serde_json::json!({
            "state": result.state(),
            "urls": result,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(result);
    }
    Ok(())
}

// Prints the result as a human-readable table in the terminal
fn print_table(result: &CrawlResult) {
    println!("{:<80} {:<10}", "URL", "STATUS");
    println!("{}", "=".repeat(91));

    let rows = result
        .failed
        .iter()
        .map(|url| (url, "❌ FAILED"))
        .chain(result.successful.iter().map(|url| (url, "✅ WARMED")));

    for (url, status) in rows {
        // Truncate URL if too long for display
        let url_display = if url.chars().count() > 77 {
            format!("{}...", url.chars().take(77).collect::<String>())
        } else {
            url.clone()
        };
        println!("{:<80} {:<10}", url_display, status);
    }

    println!();
    println!("📊 Summary: {}", format_state(result.state()));
    println!("   ✅ Warmed: {}", result.successful.len());
    println!("   ❌ Failed: {}", result.failed.len());
    println!("   📋 Total: {}", result.len());
}

fn format_state(state: WarmupState) -> &'static str {
    match state {
        WarmupState::Success => "all caches warmed",
        WarmupState::Warning => "some URLs could not be warmed",
        WarmupState::Failed => "no URL could be warmed",
        WarmupState::Unknown => "nothing was crawled",
    }
}
