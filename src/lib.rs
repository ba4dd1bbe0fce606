//! go2web library: a minimal HTTP/1.1 client over raw sockets
//!
//! Requests are hand-serialized and written to a plain or TLS stream, the
//! response is read until the server closes the connection and parsed back into
//! status code, headers and body. Redirects are followed with loop detection and
//! a hop limit, and completed fetches can be served from a time-bounded on-disk
//! cache keyed by URL.
//!
//! # Example
//!
//! ```no_run
//! use go2web::{Client, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(Config::default());
//! let result = client.fetch("https://example.com", Some("text/html"))?;
//! println!("{:?} ({} bytes)", result.envelope.status_code, result.envelope.body.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! Everything is synchronous and blocking. Running several processes against the
//! same cache file is not safe: the file is rewritten whole on every store, with
//! no locking, so concurrent writers can lose updates.

pub mod cache;
pub mod config;
pub mod error_handling;
pub mod fetch;
pub mod initialization;
pub mod render;
pub mod search;

// Re-export public API
pub use cache::{CacheEntry, CacheStore, FileStore, MemoryStore, UrlCache};
pub use config::{Config, LogFormat, LogLevel, Opt};
pub use error_handling::{CacheError, FetchError, FetchStage, InputError};
pub use fetch::{
    decompose, fetch_with_redirects, Client, FetchResult, FetchSource, Headers,
    RedirectTerminal, RequestSpec, RequestTarget, ResponseEnvelope, Scheme,
};
pub use render::{render_body, RenderedBody};
pub use search::{search, SearchResult};
