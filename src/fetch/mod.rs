//! Fetching over raw sockets.
//!
//! This module provides:
//! - URL decomposition into a [`RequestTarget`]
//! - HTTP/1.1 request serialization
//! - Plain and TLS transport, one connection per request
//! - Response parsing from the raw byte stream
//! - Redirect following with loop detection and a hop limit
//! - [`Client`], which layers the URL cache over all of the above

mod headers;
mod redirects;
mod request;
mod response;
mod target;
mod transport;


use log::{info, warn};

use crate::cache::{FileStore, UrlCache};
use crate::config::Config;
use crate::error_handling::FetchError;

// Re-export public API
pub use headers::Headers;
pub use redirects::{fetch_with_redirects, RedirectOutcome, RedirectTerminal};
pub use request::{serialize, RequestSpec};
pub use response::{parse_response, read_response, ResponseEnvelope};
pub use target::{decompose, RequestTarget, Scheme};
pub use transport::{connect, Connection, Exchange, SocketExchange};

/// Where a [`FetchResult`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    Cache,
    Network,
}

/// Outcome of a top-level fetch.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// The URL as requested (also the cache key)
    pub url: String,
    pub envelope: ResponseEnvelope,
    pub source: FetchSource,
    /// For cache hits, `HopLimitExceeded` if the stored fetch hit the hop limit, else `Done`
    pub terminal: RedirectTerminal,
    /// URLs requested on the network, in order; empty for cache hits
    pub chain: Vec<String>,
}

/// A blocking HTTP client with an optional response cache.
pub struct Client<E: Exchange = SocketExchange> {
    exchange: E,
    cache: Option<UrlCache>,
    config: Config,
}

impl Client<SocketExchange> {
    /// Builds a socket-backed client from `config`.
    ///
    /// If the cache file cannot be opened the client runs without a cache.
    pub fn new(config: Config) -> Self {
        let cache = if config.use_cache {
            match FileStore::open(&config.cache_file) {
                Ok(store) => {
                    Some(UrlCache::new(store).with_max_age(config.cache_max_age_secs))
                }
                Err(e) => {
                    warn!(
                        "Cache disabled, cannot open {}: {e}",
                        config.cache_file.display()
                    );
                    None
                }
            }
        } else {
            None
        };
        Self::with_exchange(SocketExchange, config, cache)
    }
}

impl<E: Exchange> Client<E> {
    pub fn with_exchange(exchange: E, config: Config, cache: Option<UrlCache>) -> Self {
        Self {
            exchange,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The `GET` sent for `target`: configured timeout, `User-Agent` and
    /// optional `Accept`.
    pub fn request_spec(&self, target: RequestTarget, accept: Option<&str>) -> RequestSpec {
        let mut spec = RequestSpec::get(target)
            .with_accept(accept.map(str::to_string))
            .with_timeout(self.config.timeout);
        spec.headers.insert("User-Agent", self.config.user_agent.as_str());
        spec
    }

    /// Fetches `url`, serving a fresh cached response when there is one.
    ///
    /// On a miss the redirect controller runs and a result with a status code
    /// is stored under `url`. Malformed responses (absent status) and loop
    /// terminals are never stored. Cache write failures are logged only.
    ///
    /// # Errors
    ///
    /// `FetchError::Input` for an unparsable URL or redirect target,
    /// `FetchError::Transport` when any hop fails to connect, send or receive.
    pub fn fetch(&self, url: &str, accept: Option<&str>) -> Result<FetchResult, FetchError> {
        if let Some(entry) = self.cache.as_ref().and_then(|cache| cache.get(url)) {
            info!("Serving {url} from cache");
            let terminal = if entry.hop_limit_exceeded {
                RedirectTerminal::HopLimitExceeded
            } else {
                RedirectTerminal::Done
            };
            return Ok(FetchResult {
                url: url.to_string(),
                envelope: ResponseEnvelope {
                    status_code: entry.status_code,
                    headers: Some(entry.headers),
                    body: entry.body,
                },
                source: FetchSource::Cache,
                terminal,
                chain: Vec::new(),
            });
        }

        let target = decompose(url)?;
        let spec = self.request_spec(target, accept);
        let outcome = fetch_with_redirects(&self.exchange, &spec, self.config.max_hops)?;

        if let (Some(cache), Some(status_code)) = (&self.cache, outcome.envelope.status_code) {
            let headers = outcome.envelope.headers.clone().unwrap_or_default();
            let hop_limit_exceeded = outcome.terminal == RedirectTerminal::HopLimitExceeded;
            match cache.put(
                url,
                Some(status_code),
                &headers,
                &outcome.envelope.body,
                hop_limit_exceeded,
            ) {
                Ok(()) => info!("Cached {url} ({status_code})"),
                Err(e) => warn!("Failed to cache {url}: {e}"),
            }
        }

        Ok(FetchResult {
            url: url.to_string(),
            envelope: outcome.envelope,
            source: FetchSource::Network,
            terminal: outcome.terminal,
            chain: outcome.chain,
        })
    }
}
