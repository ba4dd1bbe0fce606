//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `go2web` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;

use go2web::fetch::FetchResult;
use go2web::initialization::{init_crypto_provider, init_logger_with};
use go2web::{render_body, search, Client, Config, FetchSource, Opt};

fn main() {
    if let Err(e) = run() {
        eprintln!("go2web error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;
    init_crypto_provider();

    let client = Client::new(Config::from(&opt));

    let result = if let Some(query) = opt.search_query() {
        let (results, fetch) =
            search(&client, &query).with_context(|| format!("Search for '{query}' failed"))?;
        print_fetch_summary(&fetch);
        if results.is_empty() {
            println!("No results for '{query}'");
        }
        for (index, hit) in results.iter().enumerate() {
            println!("{:>2}. {}", index + 1, hit.title.bold());
            println!("    {}", hit.url.cyan());
        }
        fetch
    } else if let Some(url) = opt.url.as_deref() {
        let fetch = client
            .fetch(url, opt.accept.as_deref())
            .with_context(|| format!("Request to {url} failed"))?;
        print_fetch_summary(&fetch);
        if let Some(headers) = &fetch.envelope.headers {
            for (name, value) in headers.iter() {
                println!("{}: {}", name.cyan(), value);
            }
        }
        println!();
        let content_type = fetch.envelope.header_ignore_case("Content-Type");
        println!("{}", render_body(&fetch.envelope.body, content_type));
        fetch
    } else {
        // clap's argument group guarantees one of the two
        anyhow::bail!("either --url or --search is required");
    };

    if result.envelope.status_code.is_none() {
        let reason = if result.terminal.is_truncated() {
            "redirect loop detected"
        } else {
            "malformed response, no status line"
        };
        eprintln!("go2web error: {reason} for {}", result.url);
        process::exit(1);
    }
    Ok(())
}

fn print_fetch_summary(fetch: &FetchResult) {
    let status = match fetch.envelope.status_code {
        Some(code) if code < 400 => code.to_string().green(),
        Some(code) => code.to_string().red(),
        None => "none".red(),
    };
    let source = match fetch.source {
        FetchSource::Cache => " (cached)",
        FetchSource::Network => "",
    };
    println!("Status: {status}{source}");
    if fetch.terminal.is_truncated() {
        eprintln!(
            "{} redirect chain stopped early ({:?}) after: {}",
            "warning:".yellow(),
            fetch.terminal,
            fetch.chain.join(" -> ")
        );
    }
}
