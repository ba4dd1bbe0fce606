//! Time-bounded URL cache.
//!
//! Entries are keyed by the URL exactly as the caller passed it and served
//! while `now - fetched_at < max_age`. Stale entries are ignored, never
//! evicted, so the backing file only grows. Store failures are logged and
//! treated as a miss; they never fail a fetch.

mod store;
mod types;

use log::{debug, warn};

use crate::config::CACHE_MAX_AGE_SECS;
use crate::error_handling::CacheError;
use crate::fetch::Headers;

pub use store::{CacheStore, FileStore, MemoryStore};
pub use types::{CacheEntry, CacheMap, Clock, ManualClock, SystemClock};

pub struct UrlCache {
    store: Box<dyn CacheStore>,
    clock: Box<dyn Clock>,
    max_age: f64,
}

impl UrlCache {
    /// A cache over `store` using the wall clock and the default freshness window.
    pub fn new(store: impl CacheStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            clock: Box::new(SystemClock),
            max_age: CACHE_MAX_AGE_SECS,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Freshness window in seconds.
    pub fn with_max_age(mut self, max_age: f64) -> Self {
        self.max_age = max_age;
        self
    }

    /// Returns the entry for `url` if one exists and is still fresh.
    pub fn get(&self, url: &str) -> Option<CacheEntry> {
        let mut entries = match self.store.load() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Ignoring unreadable cache: {e}");
                return None;
            }
        };
        let entry = entries.remove(url)?;

        let age = self.clock.now() - entry.fetched_at;
        if age < self.max_age {
            Some(entry)
        } else {
            debug!("Cache entry for {url} is stale ({age:.0}s old)");
            None
        }
    }

    /// Stores (or overwrites) the entry for `url`, stamped with the current time.
    ///
    /// An unreadable existing cache is replaced by one holding only this entry.
    ///
    /// # Errors
    ///
    /// Returns `CacheError` if the store cannot be written.
    pub fn put(
        &self,
        url: &str,
        status_code: Option<u16>,
        headers: &Headers,
        body: &str,
        hop_limit_exceeded: bool,
    ) -> Result<(), CacheError> {
        let mut entries = self.store.load().unwrap_or_else(|e| {
            warn!("Replacing unreadable cache: {e}");
            CacheMap::new()
        });
        entries.insert(
            url.to_string(),
            CacheEntry {
                url: url.to_string(),
                fetched_at: self.clock.now(),
                status_code,
                headers: headers.clone(),
                body: body.to_string(),
                hop_limit_exceeded,
            },
        );
        self.store.save(&entries)
    }
}
