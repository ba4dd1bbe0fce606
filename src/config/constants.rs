//! Configuration constants.
//!
//! This module defines the defaults used throughout the client: timeouts,
//! redirect and cache limits, and the search endpoint.

use std::time::Duration;

// Network operation timeouts
/// Per-socket-operation timeout in seconds (connect, each read, each write)
/// Applies to every hop individually, so a full redirect chain may take up to
/// `max_hops × timeout` in the worst case
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

/// Size of each read from the socket while draining a response
pub const READ_CHUNK_SIZE: usize = 4096;

// Redirect handling
/// Maximum number of redirect hops to follow
/// The controller issues at most `DEFAULT_MAX_REDIRECT_HOPS + 1` requests
pub const DEFAULT_MAX_REDIRECT_HOPS: usize = 5;

/// Status codes the redirect controller follows when a `Location` header is present
pub const REDIRECT_STATUS_CODES: [u16; 5] = [301, 302, 303, 307, 308];

// Ports
pub const HTTP_DEFAULT_PORT: u16 = 80;
pub const HTTPS_DEFAULT_PORT: u16 = 443;

// Cache
/// Freshness window for cached responses, in seconds
pub const CACHE_MAX_AGE_SECS: f64 = 3600.0;
/// Default cache file, relative to the working directory
pub const CACHE_FILE: &str = "go2web_cache.json";

/// Default User-Agent string sent with every request.
///
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str = concat!("go2web/", env!("CARGO_PKG_VERSION"));

/// Default request method
pub const DEFAULT_METHOD: &str = "GET";

// Search
/// DuckDuckGo HTML endpoint (no JavaScript required to read results)
pub const SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
/// Maximum number of search results returned
pub const SEARCH_RESULT_LIMIT: usize = 10;
