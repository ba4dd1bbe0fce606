//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgGroup, Parser, ValueEnum};

use crate::config::constants::{
    CACHE_FILE, CACHE_MAX_AGE_SECS, DEFAULT_MAX_REDIRECT_HOPS, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// This is the core configuration struct used by [`crate::Client`]. It can be
/// constructed programmatically without any CLI dependencies.
///
/// # Examples
///
/// ```no_run
/// use go2web::Config;
///
/// let config = Config {
///     max_hops: 3,
///     use_cache: false,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Per-socket-operation timeout
    pub timeout: Duration,

    /// Maximum redirect hops to follow
    pub max_hops: usize,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Whether responses are served from and stored into the cache file
    pub use_cache: bool,

    /// Cache file path
    pub cache_file: PathBuf,

    /// Cache freshness window in seconds
    pub cache_max_age_secs: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_hops: DEFAULT_MAX_REDIRECT_HOPS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            use_cache: true,
            cache_file: PathBuf::from(CACHE_FILE),
            cache_max_age_secs: CACHE_MAX_AGE_SECS,
        }
    }
}

/// Command-line options for the `go2web` binary.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "go2web",
    version,
    about = "Make HTTP requests over raw sockets and search the web"
)]
#[command(group(ArgGroup::new("target").required(true).args(["url", "search"])))]
pub struct Opt {
    /// Make an HTTP request to the specified URL and print the response
    #[arg(short = 'u', long)]
    pub url: Option<String>,

    /// Search the term on DuckDuckGo and print the top results
    #[arg(short = 's', long, num_args = 1..)]
    pub search: Option<Vec<String>>,

    /// Preferred response media type (sent as the Accept header)
    #[arg(short = 'a', long)]
    pub accept: Option<String>,

    /// Bypass the response cache entirely
    #[arg(long)]
    pub no_cache: bool,

    /// Cache file path
    #[arg(long, default_value = CACHE_FILE)]
    pub cache_file: PathBuf,

    /// Cache freshness window in seconds
    #[arg(long, default_value_t = CACHE_MAX_AGE_SECS)]
    pub cache_max_age: f64,

    /// Per-socket-operation timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Maximum redirect hops to follow
    #[arg(long, default_value_t = DEFAULT_MAX_REDIRECT_HOPS)]
    pub max_hops: usize,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Opt {
    /// Search terms joined into a single query, if a search was requested.
    pub fn search_query(&self) -> Option<String> {
        self.search.as_ref().map(|terms| terms.join(" "))
    }
}

impl From<&Opt> for Config {
    fn from(opt: &Opt) -> Self {
        Self {
            timeout: Duration::from_secs(opt.timeout_seconds),
            max_hops: opt.max_hops,
            user_agent: opt.user_agent.clone(),
            use_cache: !opt.no_cache,
            cache_file: opt.cache_file.clone(),
            cache_max_age_secs: opt.cache_max_age,
        }
    }
}
